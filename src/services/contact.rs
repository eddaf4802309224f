// Contact form submission: lead upsert, submission row, activity.

use serde_json::json;

use crate::db::{LeadInput, NewActivity, ACTOR_SYSTEM};
use crate::error::SubmissionError;
use crate::forms::ContactForm;
use crate::store::RecordStore;
use crate::types::{ActivityType, LeadSource};

use super::leads::upsert_lead;

#[derive(Debug, Clone)]
pub struct ContactReceipt {
    pub lead_id: String,
    pub submission_id: String,
    pub new_lead: bool,
}

pub fn submit_contact(
    store: &dyn RecordStore,
    form: &ContactForm,
) -> Result<ContactReceipt, SubmissionError> {
    let contact = form.validate().map_err(SubmissionError::Validation)?;

    let input = LeadInput {
        email: contact.email.clone(),
        name: contact.name.clone(),
        company: contact.company.clone(),
        inquiry_type: Some(contact.inquiry_type.as_str().to_string()),
        has_contact_submission: true,
        ..Default::default()
    };
    let outcome = upsert_lead(store, LeadSource::ContactForm, &input)?;
    let lead_id = outcome.lead.id;

    let submission = store.insert_contact_submission(&lead_id, &contact.message)?;

    store.insert_activity(&NewActivity {
        lead_id: lead_id.clone(),
        activity_type: ActivityType::ContactFormSubmitted.as_str().to_string(),
        description: format!("Contact form submitted: {}", contact.inquiry_type),
        metadata: json!({
            "inquiry_type": contact.inquiry_type.as_str(),
            "has_company": contact.company.is_some(),
            "message_length": contact.message.chars().count(),
        }),
        created_by: ACTOR_SYSTEM.to_string(),
    })?;

    log::info!(
        "Contact submission stored: lead={} new_lead={} inquiry={}",
        lead_id,
        outcome.created,
        contact.inquiry_type
    );

    Ok(ContactReceipt {
        lead_id,
        submission_id: submission.id,
        new_lead: outcome.created,
    })
}
