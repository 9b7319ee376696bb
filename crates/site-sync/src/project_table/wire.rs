//! Wire shapes of the `projects` table.
//!
//! | Domain | Column |
//! |---|---|
//! | `budget` | `total_budget` |
//! | `spent` | `amount_spent` |
//! | `progress` | `physical_progress` |
//! | `projected_end` | `projected_end_date` |
//!
//! Every other field keeps its name. Null numeric columns read as zero.

use crate::model::{
    Project, ProjectCreate, ProjectId, ProjectStatus, ProjectUpdate, StatsSample,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Columns the aggregate selects.
pub const STATS_COLUMNS: &[&str] = &["status", "total_budget", "amount_spent", "physical_progress"];

/// Columns the term search matches against.
pub const SEARCH_COLUMNS: &[&str] = &["name", "client"];

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRow {
    id: String,
    name: String,
    #[serde(default)]
    client: Option<String>,
    status: ProjectStatus,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    projected_end_date: Option<NaiveDate>,
    #[serde(default)]
    total_budget: Option<f64>,
    #[serde(default)]
    amount_spent: Option<f64>,
    #[serde(default)]
    physical_progress: Option<f64>,
    #[serde(default)]
    team_size: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: ProjectId(row.id),
            name: row.name,
            client: row.client.unwrap_or_default(),
            status: row.status,
            location: row.location.unwrap_or_default(),
            start_date: row.start_date,
            projected_end: row.projected_end_date,
            budget: row.total_budget.unwrap_or(0.0),
            spent: row.amount_spent.unwrap_or(0.0),
            progress: row.physical_progress.unwrap_or(0.0),
            team_size: row.team_size.unwrap_or(0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProjectRow {
    name: String,
    client: String,
    status: ProjectStatus,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projected_end_date: Option<NaiveDate>,
    total_budget: f64,
    amount_spent: f64,
    physical_progress: f64,
    team_size: u32,
}

impl From<ProjectCreate> for NewProjectRow {
    fn from(params: ProjectCreate) -> Self {
        Self {
            name: params.name,
            client: params.client,
            status: params.status,
            location: params.location,
            start_date: params.start_date,
            projected_end_date: params.projected_end,
            total_budget: params.budget,
            amount_spent: params.spent.unwrap_or(0.0),
            physical_progress: params.progress.unwrap_or(0.0),
            team_size: params.team_size.unwrap_or(0),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct ProjectPatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projected_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_size: Option<u32>,
}

impl From<ProjectUpdate> for ProjectPatchRow {
    fn from(update: ProjectUpdate) -> Self {
        Self {
            name: update.name,
            client: update.client,
            status: update.status,
            location: update.location,
            start_date: update.start_date,
            projected_end_date: update.projected_end,
            total_budget: update.budget,
            amount_spent: update.spent,
            physical_progress: update.progress,
            team_size: update.team_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsRow {
    status: ProjectStatus,
    #[serde(default)]
    total_budget: Option<f64>,
    #[serde(default)]
    amount_spent: Option<f64>,
    #[serde(default)]
    physical_progress: Option<f64>,
}

impl From<StatsRow> for StatsSample {
    fn from(row: StatsRow) -> Self {
        Self {
            status: row.status,
            budget: row.total_budget.unwrap_or(0.0),
            spent: row.amount_spent.unwrap_or(0.0),
            progress: row.physical_progress.unwrap_or(0.0),
        }
    }
}
