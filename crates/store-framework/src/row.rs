//! # Wire Rows
//!
//! The store speaks in untyped JSON objects keyed by column name. Records map
//! themselves to and from rows with serde, which is where wire column names are
//! translated to domain field names.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A single table row as it travels over the store boundary.
pub type Row = serde_json::Map<String, Value>;

/// Column every table uses for its primary key.
pub const ID_COLUMN: &str = "id";
/// Store-assigned creation timestamp.
pub const CREATED_AT_COLUMN: &str = "created_at";
/// Store-assigned last-update timestamp.
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Serializes a wire struct into a row. Fails if it does not serialize to an object.
pub fn to_row<S: Serialize>(value: &S) -> Result<Row, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserializes a row into a wire struct.
pub fn from_row<D: DeserializeOwned>(row: Row) -> Result<D, serde_json::Error> {
    serde_json::from_value(Value::Object(row))
}

/// Reads the primary key of a row, if present and a string.
pub fn row_id(row: &Row) -> Option<&str> {
    row.get(ID_COLUMN).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wire {
        id: String,
        total_budget: f64,
    }

    #[test]
    fn test_to_row_and_back() {
        let wire = Wire {
            id: "abc".into(),
            total_budget: 10.5,
        };
        let row = to_row(&wire).unwrap();
        assert_eq!(row.get("total_budget"), Some(&json!(10.5)));
        assert_eq!(row_id(&row), Some("abc"));

        let back: Wire = from_row(row).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn test_to_row_rejects_non_objects() {
        assert!(to_row(&42).is_err());
        assert!(to_row(&vec![1, 2]).is_err());
    }
}
