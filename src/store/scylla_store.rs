use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::document_store::{DocumentStore, StoreError};
use crate::domain::{Group, TableID};

// ============================================================================
// ScyllaDB Document Store
// ============================================================================
//
// Layout:
// - one CQL table per group: `<keyspace>.<group>`
// - one partition per table name: `name text PRIMARY KEY`
// - `rows list<text>`, each element a JSON-encoded row
//
// CQL UPDATE is an upsert, so both writes create the document when it is
// missing. `rows = rows + ?` is a single atomic list append.
//
// ============================================================================

pub struct ScyllaStore {
    uri: String,
    keyspace: String,
    groups: Vec<Group>,
    session: RwLock<Option<Arc<Session>>>,
}

impl ScyllaStore {
    /// Store for the given groups; their tables are created on `start`
    pub fn new(uri: &str, keyspace: &str, groups: impl IntoIterator<Item = Group>) -> Self {
        Self {
            uri: uri.to_string(),
            keyspace: keyspace.to_string(),
            groups: groups.into_iter().collect(),
            session: RwLock::new(None),
        }
    }

    async fn session(&self) -> Result<Arc<Session>, StoreError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotConnected)
    }

    fn table(&self, group: &Group) -> String {
        format!("{}.{}", self.keyspace, group)
    }

    async fn ensure_schema(&self, session: &Session) -> Result<(), StoreError> {
        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
                    self.keyspace
                ),
                &[],
            )
            .await
            .map_err(StoreError::backend)?;

        for group in &self.groups {
            session
                .query_unpaged(
                    format!(
                        "CREATE TABLE IF NOT EXISTS {} (name text PRIMARY KEY, rows list<text>)",
                        self.table(group)
                    ),
                    &[],
                )
                .await
                .map_err(StoreError::backend)?;
        }

        Ok(())
    }

    fn encode(id: &TableID, rows: &[Value]) -> Result<Vec<String>, StoreError> {
        rows.iter()
            .map(serde_json::to_string)
            .collect::<Result<_, _>>()
            .map_err(|source| StoreError::Decode {
                id: id.clone(),
                source,
            })
    }
}

#[async_trait]
impl DocumentStore for ScyllaStore {
    async fn start(&self) -> Result<(), StoreError> {
        tracing::info!(uri = %self.uri, keyspace = %self.keyspace, "Connecting to ScyllaDB...");

        let session: Session = SessionBuilder::new()
            .known_node(&self.uri)
            .build()
            .await
            .map_err(StoreError::backend)?;

        self.ensure_schema(&session).await?;

        *self.session.write().await = Some(Arc::new(session));
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), StoreError> {
        // Session closes its connections when the last handle is dropped
        self.session.write().await.take();
        tracing::info!(keyspace = %self.keyspace, "Disconnected from ScyllaDB");
        Ok(())
    }

    async fn find_rows(&self, id: &TableID) -> Result<Option<Vec<Value>>, StoreError> {
        let session = self.session().await?;

        let result = session
            .query_unpaged(
                format!("SELECT rows FROM {} WHERE name = ?", self.table(&id.group)),
                (id.name.as_str(),),
            )
            .await
            .map_err(StoreError::backend)?;

        let rows_result = result.into_rows_result().map_err(StoreError::backend)?;

        let Some((stored,)) = rows_result
            .maybe_first_row::<(Option<Vec<String>>,)>()
            .map_err(StoreError::backend)?
        else {
            return Ok(None);
        };

        stored
            .unwrap_or_default()
            .iter()
            .map(|row| serde_json::from_str(row))
            .collect::<Result<Vec<Value>, _>>()
            .map(Some)
            .map_err(|source| StoreError::Decode {
                id: id.clone(),
                source,
            })
    }

    async fn set_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError> {
        let session = self.session().await?;
        let encoded = Self::encode(id, rows)?;

        session
            .query_unpaged(
                format!("UPDATE {} SET rows = ? WHERE name = ?", self.table(&id.group)),
                (encoded, id.name.as_str()),
            )
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn push_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError> {
        let session = self.session().await?;
        let encoded = Self::encode(id, rows)?;

        session
            .query_unpaged(
                format!("UPDATE {} SET rows = rows + ? WHERE name = ?", self.table(&id.group)),
                (encoded, id.name.as_str()),
            )
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Database round-trips need a running ScyllaDB node and are not covered here.

    #[test]
    fn test_table_name_is_keyspace_qualified() {
        let store = ScyllaStore::new("127.0.0.1:9042", "tables_ks", [Group::new("securities")]);
        assert_eq!(store.table(&Group::new("securities")), "tables_ks.securities");
    }

    #[tokio::test]
    async fn test_calls_fail_before_start() {
        let store = ScyllaStore::new("127.0.0.1:9042", "tables_ks", []);
        let id = TableID::new(Group::new("securities"), "securities");

        let err = store.find_rows(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));
    }
}
