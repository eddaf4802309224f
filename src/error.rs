//! Error taxonomy for form submissions.
//!
//! - Validation: client-correctable, 400 with field-level messages
//! - Storage: the record store failed, 500 with an opaque body
//! - Internal: anything else unexpected, also an opaque 500
//!
//! A storage failure after the lead write leaves the lead in place. Callers
//! can resubmit safely because the lead upsert is keyed by email.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SubmissionError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            SubmissionError::Validation(_) => 400,
            SubmissionError::Storage(_) | SubmissionError::Internal(_) => 500,
        }
    }
}
