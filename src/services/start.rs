use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::tables::trading_dates;
use crate::domain::{Command, TableID};

// ============================================================================
// Work Started - Seed command producer
// ============================================================================
//
// Emits exactly one command for the trading calendar, dated with the last
// trading day whose data is final. Yesterday's data is published shortly
// after local midnight; before the cutoff only the day before yesterday is
// safe to request.
//
// ============================================================================

pub struct WorkStarted {
    zone: FixedOffset,
    cutoff: NaiveTime,
}

impl WorkStarted {
    pub fn new(zone: FixedOffset, cutoff: NaiveTime) -> Self {
        Self { zone, cutoff }
    }

    /// Last trading day with final data, as seen at `now`
    pub fn last_day(&self, now: DateTime<Utc>) -> NaiveDate {
        let local = now.with_timezone(&self.zone);
        let lag = if local.time() < self.cutoff { 2 } else { 1 };

        local.date_naive() - Days::new(lag)
    }

    /// Spawn the single send; the channel closes once it is done or cancelled
    pub fn start(&self, cancel: CancellationToken) -> mpsc::Receiver<Command> {
        let (tx, rx) = mpsc::channel(1);
        let cmd = Command::new(
            TableID::singleton(trading_dates::GROUP),
            self.last_day(Utc::now()),
        );

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Seed command cancelled before send");
                }
                sent = tx.send(cmd) => match sent {
                    Ok(()) => tracing::info!("Seed command sent"),
                    Err(e) => tracing::warn!(group = %e.0.group, "Seed command receiver dropped"),
                },
            }
            // `tx` drops here and closes the channel
        });

        rx
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
