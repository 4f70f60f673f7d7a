use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::domain::TableID;

// ============================================================================
// Document Store - Persistence seam for table rows
// ============================================================================
//
// One document per table: collection = group, key = name, holding an
// ordered `rows` sequence. Both writes are upserts.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store is not connected")]
    NotConnected,

    #[error("Store operation '{operation}' timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to decode rows of {id}: {source}")]
    Decode {
        id: TableID,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Establish the connection
    async fn start(&self) -> Result<(), StoreError>;

    /// Release the connection
    async fn shutdown(&self) -> Result<(), StoreError>;

    /// Stored rows of `id`, `None` when no document exists
    async fn find_rows(&self, id: &TableID) -> Result<Option<Vec<Value>>, StoreError>;

    /// Overwrite the rows of `id`, creating the document if absent
    async fn set_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError>;

    /// Append to the rows of `id`, creating the document if absent
    async fn push_rows(&self, id: &TableID, rows: &[Value]) -> Result<(), StoreError>;
}
