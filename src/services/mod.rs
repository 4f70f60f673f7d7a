// ============================================================================
// Services - Seed producer and command handling
// ============================================================================

pub mod command_handler;
pub mod start;

pub use command_handler::{CommandHandler, NoopUpdater, TableUpdater};
pub use start::WorkStarted;
