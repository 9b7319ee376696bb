//! # Query Model
//!
//! A small, store-agnostic description of a row query: which table, which
//! columns, which filters, and in what order. [`Query`] is a builder so
//! services can compose filters step by step, the same way they would chain
//! calls on a PostgREST-style client.
//!
//! The in-process store evaluates queries with [`Query::matches`] and
//! [`Query::sort`]; remote backends translate them into their own dialect.

use crate::row::Row;
use serde_json::Value;
use std::cmp::Ordering;

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: Value },
    /// Any of `columns` contains `needle`, ignoring case.
    AnyContains { columns: Vec<String>, needle: String },
}

impl Filter {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq { column, value } => row.get(column) == Some(value),
            Filter::AnyContains { columns, needle } => {
                let needle = needle.to_lowercase();
                columns.iter().any(|column| {
                    row.get(column)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Sort order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// A row query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    /// `None` selects every column.
    pub columns: Option<Vec<String>>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            filters: Vec::new(),
            order: None,
        }
    }

    /// Restricts the returned columns.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Case-insensitive substring match over any of `columns`.
    pub fn any_contains(mut self, columns: &[&str], needle: impl Into<String>) -> Self {
        self.filters.push(Filter::AnyContains {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            needle: needle.into(),
        });
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: true,
        });
        self
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: false,
        });
        self
    }

    /// True when every filter accepts the row.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Stable sort by the order column; rows without the column sort last.
    pub fn sort(&self, rows: &mut [Row]) {
        let Some(order) = &self.order else { return };
        rows.sort_by(|a, b| {
            let ordering = match (a.get(&order.column), b.get(&order.column)) {
                (Some(x), Some(y)) => compare_values(x, y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if order.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    /// Drops columns that were not selected.
    pub fn project(&self, row: Row) -> Row {
        match &self.columns {
            None => row,
            Some(columns) => row
                .into_iter()
                .filter(|(key, _)| columns.iter().any(|c| c == key))
                .collect(),
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
