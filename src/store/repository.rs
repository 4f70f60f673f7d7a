use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::document_store::{DocumentStore, StoreError};
use crate::domain::{Factory, Table, TableEvent, TableID};
use crate::metrics::Metrics;

// ============================================================================
// Table Repository
// ============================================================================
//
// Responsibilities:
// 1. Load tables, falling back to the factory's blank template
// 2. Project stored rows as JSON without building a table
// 3. Apply resolved events with upsert semantics
//
// Every store call is bounded by the configured timeout. Failures are
// returned on the first attempt; retrying is left to the caller.
//
// ============================================================================

pub struct Repo {
    factory: Arc<Factory>,
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl Repo {
    pub fn new(factory: Arc<Factory>, store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            factory,
            store,
            timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn start(&self) -> Result<(), StoreError> {
        self.call("start", self.store.start()).await?;
        tracing::info!(timeout = ?self.timeout, "Repository started");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.call("shutdown", self.store.shutdown()).await?;
        tracing::info!("Repository stopped");
        Ok(())
    }

    /// Load a table, or its blank template when nothing is stored yet
    pub async fn load(&self, id: &TableID) -> Result<Box<dyn Table>, StoreError> {
        let mut table = self.factory.new_table(id.clone());

        match self.call("load", self.store.find_rows(id)).await? {
            Some(rows) => {
                table.restore(rows).map_err(|source| StoreError::Decode {
                    id: id.clone(),
                    source,
                })?;
                tracing::debug!(group = %id.group, name = %id.name, rows = table.len(), "Loaded table");
            }
            None => {
                tracing::debug!(group = %id.group, name = %id.name, "Table not stored yet, using blank template");
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_load(id.group.as_str());
        }

        Ok(table)
    }

    /// `{"rows": [...]}` as stored, without materialising the table
    pub async fn view_rows(&self, id: &TableID) -> Result<Vec<u8>, StoreError> {
        self.factory.assert_known(id);

        let rows = self
            .call("view_rows", self.store.find_rows(id))
            .await?
            .unwrap_or_default();

        serde_json::to_vec(&RowsView { rows: &rows }).map_err(|source| StoreError::Decode {
            id: id.clone(),
            source,
        })
    }

    /// Apply a resolved event to the stored rows
    pub async fn save(&self, event: &TableEvent) -> Result<(), StoreError> {
        let id = event.id();
        self.factory.assert_known(id);

        match event {
            TableEvent::Replaced(replaced) => {
                self.call("save", self.store.set_rows(id, &replaced.rows))
                    .await?
            }
            TableEvent::Appended(appended) => {
                self.call("save", self.store.push_rows(id, &appended.rows))
                    .await?
            }
        }

        tracing::info!(
            group = %id.group,
            name = %id.name,
            event_type = event.event_type(),
            rows = event.rows().len(),
            "Saved table event"
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_save(id.group.as_str(), event.event_type());
        }

        Ok(())
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let started = Instant::now();

        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                timeout: self.timeout,
            }),
        };

        if let Err(e) = &result {
            tracing::error!(operation, error = %e, "Store call failed");
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_store_call(operation, started.elapsed(), result.is_ok());
        }

        result
    }
}

#[derive(serde::Serialize)]
struct RowsView<'a> {
    rows: &'a [Value],
}

// ============================================================================
// Unit Tests
// ============================================================================
