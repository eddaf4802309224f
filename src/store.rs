//! Record store seam used by the submission services.
//!
//! Handlers only need four capabilities: find a lead by email, create one,
//! update one by id, and append child rows. `SqliteStore` is the production
//! implementation; tests substitute their own.

use std::path::Path;

use parking_lot::Mutex;

use crate::db::{
    DbActivity, DbContactSubmission, DbError, DbEvaluation, DbLead, LeadDb, LeadInput,
    NewActivity, NewEvaluation,
};

pub trait RecordStore: Send + Sync {
    fn find_lead_by_email(&self, email: &str) -> Result<Option<DbLead>, DbError>;

    /// Must return `DbError::DuplicateEmail` when the email already exists.
    fn create_lead(&self, input: &LeadInput) -> Result<DbLead, DbError>;

    fn update_lead(&self, id: &str, input: &LeadInput) -> Result<DbLead, DbError>;

    fn insert_contact_submission(
        &self,
        lead_id: &str,
        message: &str,
    ) -> Result<DbContactSubmission, DbError>;

    fn insert_evaluation(&self, evaluation: &NewEvaluation) -> Result<DbEvaluation, DbError>;

    fn insert_activity(&self, activity: &NewActivity) -> Result<DbActivity, DbError>;
}

/// SQLite-backed store. A single connection behind a mutex; each call holds
/// the lock for one statement.
pub struct SqliteStore {
    db: Mutex<LeadDb>,
}

impl SqliteStore {
    pub fn new(db: LeadDb) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self::new(LeadDb::open_at(path)?))
    }

    /// Run a closure against the underlying database (reads, diagnostics).
    pub fn with_db<T>(&self, f: impl FnOnce(&LeadDb) -> T) -> T {
        f(&self.db.lock())
    }
}

impl RecordStore for SqliteStore {
    fn find_lead_by_email(&self, email: &str) -> Result<Option<DbLead>, DbError> {
        self.db.lock().find_lead_by_email(email)
    }

    fn create_lead(&self, input: &LeadInput) -> Result<DbLead, DbError> {
        self.db.lock().create_lead(input)
    }

    fn update_lead(&self, id: &str, input: &LeadInput) -> Result<DbLead, DbError> {
        self.db.lock().update_lead(id, input)
    }

    fn insert_contact_submission(
        &self,
        lead_id: &str,
        message: &str,
    ) -> Result<DbContactSubmission, DbError> {
        self.db.lock().insert_contact_submission(lead_id, message)
    }

    fn insert_evaluation(&self, evaluation: &NewEvaluation) -> Result<DbEvaluation, DbError> {
        self.db.lock().insert_evaluation(evaluation)
    }

    fn insert_activity(&self, activity: &NewActivity) -> Result<DbActivity, DbError> {
        self.db.lock().insert_activity(activity)
    }
}
