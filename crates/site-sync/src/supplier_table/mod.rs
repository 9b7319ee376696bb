//! # Supplier Table
//!
//! Binds [`Supplier`] to the `suppliers` table. The record decodes rows
//! directly; only `contact` is renamed on the wire (`contact_name`).

use crate::model::{Supplier, SupplierCreate, SupplierFilter, SupplierUpdate};
use store_framework::{from_row, to_row, Query, Row, TableRecord};

pub const TABLE: &str = "suppliers";

impl TableRecord for Supplier {
    type Id = String;
    type Create = SupplierCreate;
    type Update = SupplierUpdate;
    type Filter = SupplierFilter;
    const TABLE: &'static str = TABLE;

    fn from_row(row: Row) -> Result<Self, serde_json::Error> {
        from_row(row)
    }

    fn insert_row(params: SupplierCreate) -> Result<Row, serde_json::Error> {
        to_row(&params)
    }

    fn patch_row(update: SupplierUpdate) -> Result<Row, serde_json::Error> {
        to_row(&update)
    }

    fn apply_filter(query: Query, filter: &SupplierFilter) -> Query {
        match filter.term.as_deref().filter(|t| !t.is_empty()) {
            Some(term) => query.any_contains(&["name", "contact_name"], term),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_is_renamed_on_the_wire() {
        let row = Supplier::insert_row(SupplierCreate {
            contact: Some("Maria".into()),
            ..SupplierCreate::new("Cimento Norte")
        })
        .unwrap();

        assert_eq!(row["contact_name"], json!("Maria"));
        assert!(!row.contains_key("contact"));
        assert!(!row.contains_key("email"));
    }
}
