use rusqlite::{params, OptionalExtension};

use super::*;

const LEAD_COLUMNS: &str = "id, email, name, company, inquiry_type, source, pipeline_stage,
     has_contact_submission, has_evaluation, score, category, estimated_value,
     created_at, last_activity_at, updated_at";

impl LeadDb {
    // =========================================================================
    // Leads
    // =========================================================================

    fn map_lead_row(row: &rusqlite::Row) -> rusqlite::Result<DbLead> {
        Ok(DbLead {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            company: row.get(3)?,
            inquiry_type: row.get(4)?,
            source: row.get(5)?,
            pipeline_stage: row.get(6)?,
            has_contact_submission: row.get::<_, i32>(7)? != 0,
            has_evaluation: row.get::<_, i32>(8)? != 0,
            score: row.get(9)?,
            category: row.get(10)?,
            estimated_value: row.get(11)?,
            created_at: row.get(12)?,
            last_activity_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    /// Look up a lead by email (case-insensitive).
    pub fn find_lead_by_email(&self, email: &str) -> Result<Option<DbLead>, DbError> {
        let sql = format!(
            "SELECT {} FROM leads WHERE email = LOWER(TRIM(?1))",
            LEAD_COLUMNS
        );
        Ok(self
            .conn
            .query_row(&sql, params![email], Self::map_lead_row)
            .optional()?)
    }

    pub fn get_lead(&self, id: &str) -> Result<Option<DbLead>, DbError> {
        let sql = format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![id], Self::map_lead_row)
            .optional()?)
    }

    pub fn count_leads(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?)
    }

    /// Insert a new lead in the "new" stage.
    ///
    /// Returns `DbError::DuplicateEmail` when the email is already taken, so
    /// callers can fall back to `update_lead` without a read-then-write race.
    pub fn create_lead(&self, input: &LeadInput) -> Result<DbLead, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = self.conn.execute(
            "INSERT INTO leads (
                id, email, name, company, inquiry_type, source, pipeline_stage,
                has_contact_submission, has_evaluation, score, category, estimated_value,
                created_at, last_activity_at, updated_at
             ) VALUES (?1, LOWER(TRIM(?2)), ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13, ?13)",
            params![
                id,
                input.email,
                input.name,
                input.company,
                input.inquiry_type,
                input.source,
                STAGE_NEW,
                input.has_contact_submission as i32,
                input.has_evaluation as i32,
                input.score,
                input.category,
                input.estimated_value,
                now,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::DuplicateEmail(input.email.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        self.get_lead(&id)?.ok_or(DbError::LeadNotFound(id))
    }

    /// Apply a submission to an existing lead.
    ///
    /// Name is always replaced. Optional fields only overwrite when the
    /// submission provides them, and the submission flags can set a stored
    /// flag but never clear it. `source` and `pipeline_stage` are untouched.
    pub fn update_lead(&self, id: &str, input: &LeadInput) -> Result<DbLead, DbError> {
        let now = chrono::Utc::now().to_rfc3339();

        let changed = self.conn.execute(
            "UPDATE leads SET
                name = ?2,
                company = COALESCE(?3, company),
                inquiry_type = COALESCE(?4, inquiry_type),
                has_contact_submission = MAX(has_contact_submission, ?5),
                has_evaluation = MAX(has_evaluation, ?6),
                score = COALESCE(?7, score),
                category = COALESCE(?8, category),
                estimated_value = COALESCE(?9, estimated_value),
                last_activity_at = ?10,
                updated_at = ?10
             WHERE id = ?1",
            params![
                id,
                input.name,
                input.company,
                input.inquiry_type,
                input.has_contact_submission as i32,
                input.has_evaluation as i32,
                input.score,
                input.category,
                input.estimated_value,
                now,
            ],
        )?;

        if changed == 0 {
            return Err(DbError::LeadNotFound(id.to_string()));
        }
        self.get_lead(id)?
            .ok_or_else(|| DbError::LeadNotFound(id.to_string()))
    }
}
