//! Consulting project records
//!
//! Projects back the consultancy dashboard: one row per client engagement
//! with a status and a completion percentage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

/// Engagement status shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    /// Work in progress
    Active,

    /// Delivered
    Completed,

    /// Waiting on client sign-off
    #[serde(rename = "In Review")]
    InReview,
}

impl ProjectStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InReview => "In Review",
        }
    }
}

/// A client engagement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Client company
    pub client: String,

    /// Current status
    pub status: ProjectStatus,

    /// Completion percentage, 0 to 100
    pub progress: i32,

    /// Delivery date
    pub due_date: NaiveDate,

    /// Scope summary
    pub description: String,
}

impl Project {
    /// Create a project from validated input with a fresh id.
    pub fn create(input: NewProject) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            client: input.client,
            status: input.status,
            progress: input.progress,
            due_date: input.due_date,
            description: input.description,
        }
    }

    /// Check whether the project has been delivered.
    pub fn is_complete(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

/// Request body for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    pub client: String,

    pub status: ProjectStatus,

    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,

    pub due_date: NaiveDate,

    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

/// Partial update for a project; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank"))]
    pub client: Option<String>,

    pub status: Option<ProjectStatus>,

    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,

    pub due_date: Option<NaiveDate>,

    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
}

impl ProjectPatch {
    /// Apply the patch to a project in place.
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(client) = self.client {
            project.client = client;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if let Some(due_date) = self.due_date {
            project.due_date = due_date;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
    }
}
