// ============================================================================
// Domain Layer - Tables, Commands, Events
// ============================================================================
//
// Identity model, closed event set and command model shared by the store
// and the services. Concrete groups live in `tables`.
//
// ============================================================================

pub mod commands;
pub mod errors;
pub mod events;
pub mod factory;
pub mod table;
pub mod tables;

// Re-export for convenience
pub use commands::Command;
pub use errors::FactoryError;
pub use events::{RowsAppended, RowsReplaced, TableEvent};
pub use factory::Factory;
pub use table::{Group, RowTable, Table, TableID};
