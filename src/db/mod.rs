//! SQLite-backed record store for leads and their submissions.
//!
//! One `leads` row per normalized email; `contact_submissions`, `evaluations`
//! and `activities` are append-only children keyed by `lead_id`. No write in
//! this module spans more than one statement, so a failure between the lead
//! write and a child insert leaves the lead in place.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode};

pub mod types;
pub use types::*;

pub mod leads;
pub mod records;

pub struct LeadDb {
    conn: Connection,
}

impl LeadDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open a database at an explicit path and apply pending migrations.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL for concurrent readers while a handler holds the writer.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.leadsite/leadsite.db`.
    pub fn default_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".leadsite").join("leadsite.db"))
    }
}

/// True when a SQLite error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================
