//! # Project Table
//!
//! Binds [`Project`] to the `projects` table.
//!
//! ## Structure
//!
//! - [`wire`] - row shapes and the domain ⇄ column name mapping
//! - [`TableRecord`] implementation for [`Project`] (this module)
//!
//! ## Search
//!
//! A non-empty `term` matches `name` or `client` as a case-insensitive
//! substring; `status` restricts to exactly that status. Both are optional and
//! combine with AND.

pub mod wire;

use crate::model::{Project, ProjectCreate, ProjectFilter, ProjectId, ProjectUpdate};
use store_framework::{from_row, to_row, Query, Row, TableRecord};
use wire::{NewProjectRow, ProjectPatchRow, ProjectRow, SEARCH_COLUMNS};

pub const TABLE: &str = "projects";

/// Numeric columns the store must keep non-negative.
pub const NON_NEGATIVE_COLUMNS: &[&str] = &["total_budget", "amount_spent", "team_size"];

impl TableRecord for Project {
    type Id = ProjectId;
    type Create = ProjectCreate;
    type Update = ProjectUpdate;
    type Filter = ProjectFilter;
    const TABLE: &'static str = TABLE;

    fn from_row(row: Row) -> Result<Self, serde_json::Error> {
        from_row::<ProjectRow>(row).map(Project::from)
    }

    fn insert_row(params: ProjectCreate) -> Result<Row, serde_json::Error> {
        to_row(&NewProjectRow::from(params))
    }

    fn patch_row(update: ProjectUpdate) -> Result<Row, serde_json::Error> {
        to_row(&ProjectPatchRow::from(update))
    }

    fn apply_filter(mut query: Query, filter: &ProjectFilter) -> Query {
        if let Some(term) = filter.term.as_deref().filter(|t| !t.is_empty()) {
            query = query.any_contains(SEARCH_COLUMNS, term);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        query
    }
}
