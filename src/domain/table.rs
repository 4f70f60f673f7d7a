use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Table Identity & Table Abstraction
// ============================================================================
//
// A table is addressed by (group, name). The group selects the row schema
// and update rules; the name picks one table inside the group.
//
// Tables are never cached in-process: they are built blank by the factory
// or restored from the store on every request.
//
// ============================================================================

/// Family of tables sharing one row schema and one set of update rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Cow<'static, str>);

impl Group {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique key of a table across the whole store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableID {
    pub group: Group,
    pub name: String,
}

impl TableID {
    pub fn new(group: Group, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
        }
    }

    /// Identity of the only table in a singleton group
    pub fn singleton(group: Group) -> Self {
        let name = group.as_str().to_string();
        Self { group, name }
    }
}

impl fmt::Display for TableID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}

/// A table restored from (or destined for) the document store
pub trait Table: fmt::Debug + Send + Sync {
    fn id(&self) -> &TableID;

    /// Number of rows currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the held rows with the stored representation
    fn restore(&mut self, rows: Vec<Value>) -> Result<(), serde_json::Error>;

    /// Stored representation of the held rows, in order
    fn stored_rows(&self) -> Result<Vec<Value>, serde_json::Error>;

    fn as_any(&self) -> &dyn Any;
}

/// Table holding an ordered sequence of typed rows
///
/// Rows are kept exactly in the order the store returns them; no sorting
/// or deduplication happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable<R> {
    id: TableID,
    rows: Vec<R>,
}

impl<R> RowTable<R> {
    pub fn blank(id: TableID) -> Self {
        Self {
            id,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn last(&self) -> Option<&R> {
        self.rows.last()
    }
}

impl<R> Table for RowTable<R>
where
    R: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
    fn id(&self) -> &TableID {
        &self.id
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn restore(&mut self, rows: Vec<Value>) -> Result<(), serde_json::Error> {
        self.rows = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<R>, _>>()?;
        Ok(())
    }

    fn stored_rows(&self) -> Result<Vec<Value>, serde_json::Error> {
        self.rows.iter().map(serde_json::to_value).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {
        day: u32,
        value: i64,
    }

    const POINTS: Group = Group::from_static("points");

    #[test]
    fn test_static_and_owned_groups_are_equal() {
        assert_eq!(POINTS, Group::new("points"));
        assert_eq!(POINTS.to_string(), "points");
    }

    #[test]
    fn test_singleton_id_uses_group_as_name() {
        let id = TableID::singleton(POINTS);
        assert_eq!(id.name, "points");
        assert_eq!(id.to_string(), "points/points");
    }

    #[test]
    fn test_blank_table_has_no_rows() {
        let table: RowTable<Point> = RowTable::blank(TableID::new(POINTS, "a"));
        assert!(table.is_empty());
        assert_eq!(table.stored_rows().unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_restore_keeps_store_order() {
        let mut table: RowTable<Point> = RowTable::blank(TableID::new(POINTS, "a"));
        table
            .restore(vec![
                json!({"day": 3, "value": 30}),
                json!({"day": 1, "value": 10}),
            ])
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].day, 3);
        assert_eq!(table.last(), Some(&Point { day: 1, value: 10 }));
    }

    #[test]
    fn test_restore_rejects_malformed_rows() {
        let mut table: RowTable<Point> = RowTable::blank(TableID::new(POINTS, "a"));
        assert!(table.restore(vec![json!({"day": "x"})]).is_err());
    }
}
