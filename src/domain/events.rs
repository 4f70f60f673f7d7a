use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::table::TableID;

// ============================================================================
// Table Events - Resolved mutations of stored rows
// ============================================================================
//
// The set is closed: every consumer matches exhaustively, so a new kind of
// mutation must be handled at the persistence boundary before it compiles.
//
// ============================================================================

/// Table Event - Union type for all row mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TableEvent {
    #[serde(rename = "RowsReplaced")]
    Replaced(RowsReplaced),
    #[serde(rename = "RowsAppended")]
    Appended(RowsAppended),
}

/// Rows Replaced - stored rows are overwritten wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsReplaced {
    pub id: TableID,
    pub rows: Vec<Value>,
}

/// Rows Appended - rows go to the end of the stored sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsAppended {
    pub id: TableID,
    pub rows: Vec<Value>,
}

impl TableEvent {
    /// Build a replacement from typed rows
    pub fn replaced<R: Serialize>(id: TableID, rows: &[R]) -> Result<Self, serde_json::Error> {
        Ok(Self::Replaced(RowsReplaced {
            id,
            rows: to_values(rows)?,
        }))
    }

    /// Build an append from typed rows
    pub fn appended<R: Serialize>(id: TableID, rows: &[R]) -> Result<Self, serde_json::Error> {
        Ok(Self::Appended(RowsAppended {
            id,
            rows: to_values(rows)?,
        }))
    }

    pub fn id(&self) -> &TableID {
        match self {
            TableEvent::Replaced(event) => &event.id,
            TableEvent::Appended(event) => &event.id,
        }
    }

    pub fn rows(&self) -> &[Value] {
        match self {
            TableEvent::Replaced(event) => &event.rows,
            TableEvent::Appended(event) => &event.rows,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            TableEvent::Replaced(_) => "RowsReplaced",
            TableEvent::Appended(_) => "RowsAppended",
        }
    }
}

fn to_values<R: Serialize>(rows: &[R]) -> Result<Vec<Value>, serde_json::Error> {
    rows.iter().map(serde_json::to_value).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Group;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        n: u32,
    }

    fn id() -> TableID {
        TableID::new(Group::new("numbers"), "a")
    }

    #[test]
    fn test_replaced_from_typed_rows() {
        let event = TableEvent::replaced(id(), &[Row { n: 1 }, Row { n: 2 }]).unwrap();

        assert_eq!(event.event_type(), "RowsReplaced");
        assert_eq!(event.id(), &id());
        assert_eq!(event.rows(), &[json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn test_appended_from_typed_rows() {
        let event = TableEvent::appended(id(), &[Row { n: 7 }]).unwrap();

        match event {
            TableEvent::Appended(ref appended) => assert_eq!(appended.rows, vec![json!({"n": 7})]),
            TableEvent::Replaced(_) => panic!("Wrong event type"),
        }
        assert_eq!(event.event_type(), "RowsAppended");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = TableEvent::appended(id(), &[Row { n: 7 }]).unwrap();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "RowsAppended");
        assert_eq!(json["data"]["id"]["group"], "numbers");
    }

    #[test]
    fn test_serialized_tag_matches_event_type() {
        for event in [
            TableEvent::replaced(id(), &[Row { n: 1 }]).unwrap(),
            TableEvent::appended(id(), &[Row { n: 1 }]).unwrap(),
        ] {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
        }
    }
}
