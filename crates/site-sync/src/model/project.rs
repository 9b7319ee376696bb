//! # Project Model
//!
//! Construction projects tracked by the dashboard.
//!
//! # Store Framework
//! [`Project`] implements the [`TableRecord`](store_framework::TableRecord) trait
//! (see [`project_table`](crate::project_table)), allowing it to be served by a
//! [`ResourceService`](store_framework::ResourceService) and kept live by a
//! [`ResourceSync`](store_framework::ResourceSync).
//!
//! - Creation parameters ([`ProjectCreate`])
//! - Update parameters ([`ProjectUpdate`])
//! - Search criteria ([`ProjectFilter`])
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Store-assigned project identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status. The set is closed: rows carrying any other value fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planning,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::Active,
        ProjectStatus::Paused,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub status: ProjectStatus,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub projected_end: Option<NaiveDate>,
    /// Total budget approved.
    pub budget: f64,
    /// Amount spent so far. May exceed `budget`.
    pub spent: f64,
    /// Physical progress, 0 to 100.
    pub progress: f64,
    pub team_size: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

/// Payload for creating a project. Unset spend, progress and team size default to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCreate {
    pub name: String,
    pub client: String,
    pub status: ProjectStatus,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub projected_end: Option<NaiveDate>,
    pub budget: f64,
    pub spent: Option<f64>,
    pub progress: Option<f64>,
    pub team_size: Option<u32>,
}

impl ProjectCreate {
    /// Creates a payload with the required fields; everything else is unset.
    ///
    /// # Arguments
    /// * `name` - Project name
    /// * `client` - Client the project is built for
    /// * `status` - Initial status
    /// * `budget` - Total budget approved
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        status: ProjectStatus,
        budget: f64,
    ) -> Self {
        Self {
            name: name.into(),
            client: client.into(),
            status,
            location: String::new(),
            start_date: None,
            projected_end: None,
            budget,
            spent: None,
            progress: None,
            team_size: None,
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn schedule(mut self, start: NaiveDate, projected_end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.projected_end = Some(projected_end);
        self
    }
}

/// Partial update. `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub client: Option<String>,
    pub status: Option<ProjectStatus>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub projected_end: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub progress: Option<f64>,
    pub team_size: Option<u32>,
}

impl ProjectUpdate {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Search criteria. The default (no term, no status) lists every project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    /// Case-insensitive substring of the name or client. Empty means no filter.
    pub term: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            status: None,
        }
    }

    pub fn status(status: ProjectStatus) -> Self {
        Self {
            term: None,
            status: Some(status),
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }
}
