//! Append-only child records: contact submissions, evaluations, activities.

use rusqlite::params;

use super::*;

fn json_column(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null)
}

impl LeadDb {
    pub fn insert_contact_submission(
        &self,
        lead_id: &str,
        message: &str,
    ) -> Result<DbContactSubmission, DbError> {
        let row = DbContactSubmission {
            id: uuid::Uuid::new_v4().to_string(),
            lead_id: lead_id.to_string(),
            message: message.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.conn.execute(
            "INSERT INTO contact_submissions (id, lead_id, message, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.id, row.lead_id, row.message, row.created_at],
        )?;
        Ok(row)
    }

    pub fn insert_evaluation(&self, eval: &NewEvaluation) -> Result<DbEvaluation, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO evaluations (
                id, lead_id, answers, scores, total_score, max_possible_score,
                category, bottlenecks, is_complete, completed_at, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                eval.lead_id,
                serde_json::to_string(&eval.answers)?,
                serde_json::to_string(&eval.scores)?,
                eval.total_score,
                eval.max_possible_score,
                eval.category,
                serde_json::to_string(&eval.bottlenecks)?,
                eval.is_complete as i32,
                eval.completed_at,
                now,
            ],
        )?;
        Ok(DbEvaluation {
            id,
            lead_id: eval.lead_id.clone(),
            answers: eval.answers.clone(),
            scores: eval.scores.clone(),
            total_score: eval.total_score,
            max_possible_score: eval.max_possible_score,
            category: eval.category.clone(),
            bottlenecks: eval.bottlenecks.clone(),
            is_complete: eval.is_complete,
            completed_at: eval.completed_at.clone(),
            created_at: now,
        })
    }

    pub fn insert_activity(&self, activity: &NewActivity) -> Result<DbActivity, DbError> {
        let row = DbActivity {
            id: uuid::Uuid::new_v4().to_string(),
            lead_id: activity.lead_id.clone(),
            activity_type: activity.activity_type.clone(),
            description: activity.description.clone(),
            metadata: activity.metadata.clone(),
            created_by: activity.created_by.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.conn.execute(
            "INSERT INTO activities (
                id, lead_id, activity_type, description, metadata, created_by, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.lead_id,
                row.activity_type,
                row.description,
                serde_json::to_string(&row.metadata)?,
                row.created_by,
                row.created_at,
            ],
        )?;
        Ok(row)
    }

    // =========================================================================
    // Reads (per lead, oldest first)
    // =========================================================================

    pub fn contact_submissions_for_lead(
        &self,
        lead_id: &str,
    ) -> Result<Vec<DbContactSubmission>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, message, created_at
             FROM contact_submissions WHERE lead_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map(params![lead_id], |row| {
            Ok(DbContactSubmission {
                id: row.get(0)?,
                lead_id: row.get(1)?,
                message: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn evaluations_for_lead(&self, lead_id: &str) -> Result<Vec<DbEvaluation>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, answers, scores, total_score, max_possible_score,
                    category, bottlenecks, is_complete, completed_at, created_at
             FROM evaluations WHERE lead_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map(params![lead_id], |row| {
            Ok(DbEvaluation {
                id: row.get(0)?,
                lead_id: row.get(1)?,
                answers: json_column(row.get(2)?),
                scores: json_column(row.get(3)?),
                total_score: row.get(4)?,
                max_possible_score: row.get(5)?,
                category: row.get(6)?,
                bottlenecks: json_column(row.get(7)?),
                is_complete: row.get::<_, i32>(8)? != 0,
                completed_at: row.get(9)?,
                created_at: row.get(10)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn activities_for_lead(&self, lead_id: &str) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, activity_type, description, metadata, created_by, created_at
             FROM activities WHERE lead_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map(params![lead_id], |row| {
            Ok(DbActivity {
                id: row.get(0)?,
                lead_id: row.get(1)?,
                activity_type: row.get(2)?,
                description: row.get(3)?,
                metadata: json_column(row.get(4)?),
                created_by: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
