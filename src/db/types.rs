//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline stage every new lead starts in.
pub const STAGE_NEW: &str = "new";

/// Actor tag for rows written by form handlers.
pub const ACTOR_SYSTEM: &str = "system";

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("A lead with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Failed to encode JSON column: {0}")]
    Json(#[from] serde_json::Error),
}

/// A row from the `leads` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbLead {
    pub id: String,
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    pub inquiry_type: Option<String>,
    pub source: String,
    pub pipeline_stage: String,
    pub has_contact_submission: bool,
    pub has_evaluation: bool,
    pub score: Option<i64>,
    pub category: Option<String>,
    pub estimated_value: Option<String>,
    pub created_at: String,
    pub last_activity_at: String,
    pub updated_at: String,
}

/// Lead fields carried by one form submission. Used for both the create and
/// the update path; flags set here only ever turn a stored flag on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadInput {
    /// Already normalized (see `util::normalize_email`).
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    pub inquiry_type: Option<String>,
    /// Recorded on create only.
    pub source: String,
    pub has_contact_submission: bool,
    pub has_evaluation: bool,
    pub score: Option<i64>,
    pub category: Option<String>,
    pub estimated_value: Option<String>,
}

/// A row from `contact_submissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbContactSubmission {
    pub id: String,
    pub lead_id: String,
    pub message: String,
    pub created_at: String,
}

/// A row from `evaluations`. JSON columns are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbEvaluation {
    pub id: String,
    pub lead_id: String,
    pub answers: serde_json::Value,
    pub scores: serde_json::Value,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub category: String,
    pub bottlenecks: serde_json::Value,
    pub is_complete: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
}

/// Evaluation row to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub lead_id: String,
    pub answers: serde_json::Value,
    pub scores: serde_json::Value,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub category: String,
    pub bottlenecks: serde_json::Value,
    pub is_complete: bool,
    pub completed_at: Option<String>,
}

/// A row from `activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbActivity {
    pub id: String,
    pub lead_id: String,
    pub activity_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_by: String,
    pub created_at: String,
}

/// Activity row to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub lead_id: String,
    pub activity_type: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_by: String,
}
