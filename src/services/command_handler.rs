use async_trait::async_trait;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::{Command, Table, TableEvent};
use crate::store::Repo;

// ============================================================================
// Command Handler
// ============================================================================
//
// Orchestrates: Command → Repo::load → Updater → Event → Repo::save
//
// ============================================================================

/// Resolves a command against the current table into a mutation
///
/// Implementations talk to the market data source and decide which rows are
/// new. `None` means the table is already current.
#[async_trait]
pub trait TableUpdater: Send + Sync {
    async fn update(&self, table: &dyn Table, command: &Command) -> Result<Option<TableEvent>>;
}

/// Updater used when no data source is wired in
pub struct NoopUpdater;

#[async_trait]
impl TableUpdater for NoopUpdater {
    async fn update(&self, table: &dyn Table, command: &Command) -> Result<Option<TableEvent>> {
        tracing::info!(table = %table.id(), date = %command.day(), "No data source configured, skipping update");
        Ok(None)
    }
}

pub struct CommandHandler {
    repo: Arc<Repo>,
    updater: Arc<dyn TableUpdater>,
}

impl CommandHandler {
    pub fn new(repo: Arc<Repo>, updater: Arc<dyn TableUpdater>) -> Self {
        Self { repo, updater }
    }

    /// Handle a command and persist the resulting event
    pub async fn handle(&self, command: &Command) -> Result<Option<TableEvent>> {
        let id = command.table_id();
        let table = self.repo.load(&id).await?;

        let Some(event) = self.updater.update(table.as_ref(), command).await? else {
            tracing::debug!(table = %id, "Table is up to date");
            return Ok(None);
        };

        if event.id() != &id {
            anyhow::bail!("Updater produced event for {} while handling {}", event.id(), id);
        }

        self.repo.save(&event).await?;
        Ok(Some(event))
    }

    /// Handle commands until the channel closes; returns how many were handled
    pub async fn run(&self, mut commands: mpsc::Receiver<Command>) -> Result<usize> {
        let mut handled = 0;

        while let Some(command) = commands.recv().await {
            self.handle(&command).await?;
            handled += 1;
        }

        Ok(handled)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tables::{trading_dates, TradingDates, TradingDatesRow};
    use crate::domain::{Factory, Group, TableID};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use std::time::Duration;

    /// Extends the calendar up to the command date
    struct CalendarUpdater;

    #[async_trait]
    impl TableUpdater for CalendarUpdater {
        async fn update(&self, table: &dyn Table, command: &Command) -> Result<Option<TableEvent>> {
            let dates = table.as_any().downcast_ref::<TradingDates>().unwrap();
            if dates.last_trading_day() == Some(command.day()) {
                return Ok(None);
            }
            let row = TradingDatesRow {
                from: NaiveDate::from_ymd_opt(1997, 3, 24).unwrap(),
                till: command.day(),
            };
            Ok(Some(TableEvent::replaced(table.id().clone(), &[row])?))
        }
    }

    struct WrongTableUpdater;

    #[async_trait]
    impl TableUpdater for WrongTableUpdater {
        async fn update(&self, _table: &dyn Table, _command: &Command) -> Result<Option<TableEvent>> {
            let id = TableID::singleton(Group::new("securities"));
            Ok(Some(TableEvent::appended::<u32>(id, &[])?))
        }
    }

    async fn repo() -> Arc<Repo> {
        let repo = Repo::new(
            Arc::new(Factory::main()),
            Arc::new(MemoryStore::new()),
            Duration::from_secs(5),
        );
        repo.start().await.unwrap();
        Arc::new(repo)
    }

    fn command(d: u32) -> Command {
        Command::new(
            TableID::singleton(trading_dates::GROUP),
            NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_handle_saves_event() {
        let repo = repo().await;
        let handler = CommandHandler::new(repo.clone(), Arc::new(CalendarUpdater));

        assert!(handler.handle(&command(7)).await.unwrap().is_some());
        assert!(handler.handle(&command(7)).await.unwrap().is_none());

        let table = repo.load(&command(7).table_id()).await.unwrap();
        let dates = table.as_any().downcast_ref::<TradingDates>().unwrap();
        assert_eq!(dates.last_trading_day(), Some(command(7).day()));
    }

    #[tokio::test]
    async fn test_run_drains_channel() {
        let handler = CommandHandler::new(repo().await, Arc::new(NoopUpdater));
        let (tx, rx) = mpsc::channel(2);
        tx.send(command(7)).await.unwrap();
        tx.send(command(8)).await.unwrap();
        drop(tx);

        assert_eq!(handler.run(rx).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_event_for_other_table_is_rejected() {
        let handler = CommandHandler::new(repo().await, Arc::new(WrongTableUpdater));
        assert!(handler.handle(&command(7)).await.is_err());
    }
}
