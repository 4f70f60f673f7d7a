use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::table::{Group, RowTable, Table, TableID};

/// Singleton group with the exchange trading calendar
pub const GROUP: Group = Group::from_static("trading_dates");

/// Interval of dates with available trading history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingDatesRow {
    pub from: NaiveDate,
    pub till: NaiveDate,
}

pub type TradingDates = RowTable<TradingDatesRow>;

pub fn new_table(id: TableID) -> Box<dyn Table> {
    Box::new(TradingDates::blank(id))
}

impl TradingDates {
    /// Last day with trading history, if the calendar was ever loaded
    pub fn last_trading_day(&self) -> Option<NaiveDate> {
        self.last().map(|row| row.till)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_trading_day() {
        let mut table = TradingDates::blank(TableID::singleton(GROUP));
        assert_eq!(table.last_trading_day(), None);

        table
            .restore(vec![json!({"from": "1997-03-24", "till": "2024-03-07"})])
            .unwrap();
        assert_eq!(
            table.last_trading_day(),
            NaiveDate::from_ymd_opt(2024, 3, 7)
        );
    }
}
