//! Lead-store schema versions.
//!
//! v1 creates `leads` (unique email, pipeline stage) and its three
//! append-only child tables; v2 adds the per-lead lookup indexes. The SQL
//! files are compiled in and the applied version lives in `schema_version`.
//! An existing store is copied to `<path>.pre-migration.bak` before any
//! upgrade, and a store written by a newer leadsite is refused.

use rusqlite::backup::Backup;
use rusqlite::Connection;

/// `(version, sql)` in ascending order.
const MIGRATIONS: &[(i32, &str)] = &[
    (1, include_str!("migrations/001_baseline.sql")),
    (2, include_str!("migrations/002_lead_indexes.sql")),
];

fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(v, _)| *v)
}

fn ensure_version_table(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| format!("schema_version table: {}", e))
}

fn applied_version(conn: &Connection) -> Result<i32, String> {
    conn.query_row("SELECT IFNULL(MAX(version), 0) FROM schema_version", [], |row| {
        row.get(0)
    })
    .map_err(|e| format!("reading schema version: {}", e))
}

/// File backing the `main` schema, `None` for in-memory or temp databases.
fn main_db_file(conn: &Connection) -> Result<Option<String>, String> {
    let file: String = conn
        .query_row("PRAGMA database_list", [], |row| row.get(2))
        .map_err(|e| format!("locating database file: {}", e))?;
    Ok(Some(file).filter(|f| !f.is_empty() && f != ":memory:"))
}

/// Hot copy of an already-populated lead store. Fresh stores have no leads
/// to protect and are not copied.
fn snapshot_existing(conn: &Connection, from_version: i32) -> Result<(), String> {
    if from_version == 0 {
        return Ok(());
    }
    let Some(file) = main_db_file(conn)? else {
        return Ok(());
    };

    let target = format!("{}.pre-migration.bak", file);
    let mut dest =
        Connection::open(&target).map_err(|e| format!("opening {}: {}", target, e))?;
    Backup::new(conn, &mut dest)
        .and_then(|backup| backup.step(-1).map(|_| ()))
        .map_err(|e| format!("backing up lead store to {}: {}", target, e))?;

    log::info!("Backed up lead store (schema v{}) to {}", from_version, target);
    Ok(())
}

/// Bring the lead store up to the latest schema and return how many
/// versions were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, String> {
    ensure_version_table(conn)?;
    let from = applied_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(format!(
            "lead store is at schema v{} but this leadsite only knows v{}; \
             upgrade leadsite before opening it",
            from, latest
        ));
    }
    if from == latest {
        return Ok(0);
    }

    snapshot_existing(conn, from)?;

    let mut applied = 0;
    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > from) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| format!("schema v{}: {}", version, e))?;
        tx.execute_batch(sql)
            .and_then(|_| tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version]))
            .and_then(|_| tx.commit())
            .map_err(|e| format!("schema v{}: {}", version, e))?;
        log::info!("Lead store migrated to schema v{}", version);
        applied += 1;
    }

    Ok(applied)
}
