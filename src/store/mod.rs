// ============================================================================
// Store Layer - Table persistence
// ============================================================================
//
// `DocumentStore` is the backend seam; `Repo` is what services talk to.
//
// ============================================================================

pub mod document_store;
pub mod memory_store;
pub mod repository;
pub mod scylla_store;

pub use document_store::{DocumentStore, StoreError};
pub use memory_store::MemoryStore;
pub use repository::Repo;
pub use scylla_store::ScyllaStore;
