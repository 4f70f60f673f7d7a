use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::table::{Group, TableID};

// ============================================================================
// Table Commands - Scheduled refresh work
// ============================================================================

/// Refresh one table with data current up to `date`
///
/// `date` is always midnight UTC of the reference trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub group: Group,
    pub name: String,
    pub date: DateTime<Utc>,
}

impl Command {
    pub fn new(id: TableID, day: NaiveDate) -> Self {
        Self {
            group: id.group,
            name: id.name,
            date: day.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn table_id(&self) -> TableID {
        TableID::new(self.group.clone(), self.name.clone())
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_command_date_is_midnight_utc() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let cmd = Command::new(TableID::singleton(Group::new("dates")), day);

        assert_eq!(cmd.day(), day);
        assert_eq!(cmd.date.hour(), 0);
        assert_eq!(cmd.date.minute(), 0);
        assert_eq!(cmd.table_id(), TableID::new(Group::new("dates"), "dates"));
    }
}
