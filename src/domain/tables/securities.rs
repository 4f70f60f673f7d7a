use serde::{Deserialize, Serialize};

use crate::domain::table::{Group, RowTable, Table, TableID};

/// Singleton group with the list of securities traded on the main board
pub const GROUP: Group = Group::from_static("securities");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRow {
    pub ticker: String,
    pub isin: String,
    pub lot_size: u32,
    pub board: String,
}

pub type Securities = RowTable<SecurityRow>;

pub fn new_table(id: TableID) -> Box<dyn Table> {
    Box::new(Securities::blank(id))
}

impl Securities {
    pub fn find(&self, ticker: &str) -> Option<&SecurityRow> {
        self.rows().iter().find(|row| row.ticker == ticker)
    }
}
