use super::table::{Group, TableID};

// ============================================================================
// Table Wiring Errors
// ============================================================================
//
// These signal configuration defects, never steady-state runtime faults.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("Unknown table group: {0}")]
    UnknownGroup(Group),

    #[error("Singleton table name must equal its group: {0}")]
    InvalidSingletonName(TableID),

    #[error("Table group registered twice: {0}")]
    DuplicateGroup(Group),
}
