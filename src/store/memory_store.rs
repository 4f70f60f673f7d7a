use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::document_store::{DocumentStore, StoreError};
use crate::domain::TableID;

// ============================================================================
// In-process Document Store
// ============================================================================
//
// Same semantics as the database backend. Documents survive
// shutdown/start cycles, like a server outliving its clients.
//
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    connected: AtomicBool,
    documents: RwLock<HashMap<TableID, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn start(&self) -> Result<(), StoreError> {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), StoreError> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }

    async fn find_rows(&self, id: &TableID) -> Result<Option<Vec<Value>>, StoreError> {
        self.ensure_connected()?;
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn set_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError> {
        self.ensure_connected()?;
        self.documents.write().await.insert(id.clone(), rows.to_vec());
        Ok(())
    }

    async fn push_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError> {
        self.ensure_connected()?;
        self.documents
            .write()
            .await
            .entry(id.clone())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Group;
    use serde_json::json;

    fn id() -> TableID {
        TableID::new(Group::new("numbers"), "a")
    }

    #[tokio::test]
    async fn test_calls_fail_before_start() {
        let store = MemoryStore::new();
        let err = store.find_rows(&id()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));
    }

    #[tokio::test]
    async fn test_push_creates_missing_document() {
        let store = MemoryStore::new();
        store.start().await.unwrap();

        store.push_rows(&id(), &[json!(1)]).await.unwrap();
        store.push_rows(&id(), &[json!(2), json!(3)]).await.unwrap();

        assert_eq!(
            store.find_rows(&id()).await.unwrap(),
            Some(vec![json!(1), json!(2), json!(3)])
        );
    }

    #[tokio::test]
    async fn test_documents_survive_restart() {
        let store = MemoryStore::new();
        store.start().await.unwrap();
        store.set_rows(&id(), &[json!("x")]).await.unwrap();
        store.shutdown().await.unwrap();

        assert!(store.find_rows(&id()).await.is_err());

        store.start().await.unwrap();
        assert_eq!(store.find_rows(&id()).await.unwrap(), Some(vec![json!("x")]));
    }
}
