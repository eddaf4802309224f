// Lead upsert keyed by normalized email.

use crate::db::{DbError, DbLead, LeadInput};
use crate::store::RecordStore;
use crate::types::LeadSource;

#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub lead: DbLead,
    /// True when this call inserted the lead.
    pub created: bool,
}

/// Create the lead for `input.email`, or update it if it already exists.
///
/// Inserts first and falls back to update on a duplicate email, so two
/// concurrent first submissions for the same address both land on one row.
/// `source` and the source's default inquiry type only apply on create.
pub fn upsert_lead(
    store: &dyn RecordStore,
    source: LeadSource,
    input: &LeadInput,
) -> Result<UpsertOutcome, DbError> {
    let create = LeadInput {
        source: source.as_str().to_string(),
        inquiry_type: input
            .inquiry_type
            .clone()
            .or_else(|| source.default_inquiry_type().map(|t| t.as_str().to_string())),
        ..input.clone()
    };

    match store.create_lead(&create) {
        Ok(lead) => Ok(UpsertOutcome { lead, created: true }),
        Err(DbError::DuplicateEmail(email)) => {
            let existing = store
                .find_lead_by_email(&email)?
                .ok_or_else(|| DbError::LeadNotFound(email.clone()))?;
            let lead = store.update_lead(&existing.id, input)?;
            Ok(UpsertOutcome {
                lead,
                created: false,
            })
        }
        Err(e) => Err(e),
    }
}
