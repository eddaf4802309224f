// Evaluation submission: score, lead upsert, evaluation row, activity.

use serde::Serialize;
use serde_json::json;

use crate::db::{DbError, LeadInput, NewActivity, NewEvaluation, ACTOR_SYSTEM};
use crate::error::SubmissionError;
use crate::forms::EvaluationForm;
use crate::scoring::{self, Bottleneck, Mode, OsScores};
use crate::store::RecordStore;
use crate::types::{ActivityType, LeadSource};

use super::leads::upsert_lead;

const DEFAULT_WORKFLOW_LABEL: &str = "Workflow assessment";

/// What the results page shows right after submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPreview {
    pub category: Mode,
    pub total_score: u32,
    pub max_score: u32,
    pub os_scores: OsScores,
    pub bottlenecks: Vec<Bottleneck>,
    pub workflow_name: Option<String>,
    pub biggest_frustration: Option<String>,
    pub mode: Option<String>,
    pub focus_area: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EvaluationReceipt {
    pub lead_id: String,
    pub evaluation_id: String,
    pub new_lead: bool,
    pub estimated_value: String,
    pub preview: EvaluationPreview,
}

pub fn submit_evaluation(
    store: &dyn RecordStore,
    form: &EvaluationForm,
) -> Result<EvaluationReceipt, SubmissionError> {
    form.validate().map_err(SubmissionError::Validation)?;

    let submission = form.to_submission();
    let result = scoring::score(&submission);
    let estimated_value = scoring::estimate_value(&submission);

    let input = LeadInput {
        email: form.normalized_email(),
        name: form.trimmed_name(),
        company: form.company(),
        has_evaluation: true,
        score: Some(i64::from(result.total_score)),
        category: Some(result.category.to_string()),
        estimated_value: Some(estimated_value.clone()),
        ..Default::default()
    };
    let outcome = upsert_lead(store, LeadSource::Evaluation, &input)?;
    let lead_id = outcome.lead.id;

    let evaluation = store.insert_evaluation(&NewEvaluation {
        lead_id: lead_id.clone(),
        answers: form.answers_json(),
        scores: serde_json::to_value(result.os_scores).map_err(DbError::from)?,
        total_score: i64::from(result.total_score),
        max_possible_score: i64::from(result.max_score),
        category: result.category.to_string(),
        bottlenecks: serde_json::to_value(&result.bottlenecks).map_err(DbError::from)?,
        is_complete: true,
        completed_at: Some(chrono::Utc::now().to_rfc3339()),
    })?;

    let workflow_label = form
        .workflow_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_WORKFLOW_LABEL);

    store.insert_activity(&NewActivity {
        lead_id: lead_id.clone(),
        activity_type: ActivityType::EvaluationCompleted.as_str().to_string(),
        description: format!("Completed evaluation: {}", workflow_label),
        metadata: json!({
            "evaluation_id": evaluation.id,
            "score": result.total_score,
            "category": result.category.as_str(),
            "focus_area": form.focus_area,
            "mode": form.mode,
            "workflow_name": form.workflow_name,
            "readiness": form.readiness,
        }),
        created_by: ACTOR_SYSTEM.to_string(),
    })?;

    log::info!(
        "Evaluation stored: lead={} new_lead={} evaluation={} score={}/{} category={}",
        lead_id,
        outcome.created,
        evaluation.id,
        result.total_score,
        result.max_score,
        result.category
    );

    Ok(EvaluationReceipt {
        lead_id,
        evaluation_id: evaluation.id,
        new_lead: outcome.created,
        estimated_value,
        preview: EvaluationPreview {
            category: result.category,
            total_score: result.total_score,
            max_score: result.max_score,
            os_scores: result.os_scores,
            bottlenecks: result.bottlenecks,
            workflow_name: form.workflow_name.clone(),
            biggest_frustration: form.biggest_frustration.clone(),
            mode: form.mode.clone(),
            focus_area: form.focus_area.clone(),
        },
    })
}
