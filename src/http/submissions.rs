use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{submission_error_response, validation_response};
use crate::error::SubmissionError;
use crate::forms::{ContactForm, EvaluationForm};
use crate::services::{contact::submit_contact, evaluation::submit_evaluation};
use crate::state::AppState;

const CONTACT_FAILURE: &str = "Failed to save submission";
const EVALUATION_FAILURE: &str = "Failed to save evaluation";

/// Parse a JSON object body. Anything else is one validation message.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body)
        .and_then(|object| serde_json::from_value(serde_json::Value::Object(object)))
        .map_err(|e| {
            log::warn!("Rejected request body: {}", e);
            validation_response(vec!["Request body must be a JSON object".to_string()])
        })
}

/// Run a blocking store operation off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, SubmissionError>
where
    F: FnOnce() -> Result<T, SubmissionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SubmissionError::Internal(format!("submission task failed: {}", e)))?
}

pub(super) async fn contact_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let form: ContactForm = match parse_body(&body) {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let store = state.store.clone();
    match run_blocking(move || submit_contact(store.as_ref(), &form)).await {
        Ok(receipt) => Json(json!({
            "success": true,
            "message": "Contact form submitted successfully",
            "leadId": receipt.lead_id,
        }))
        .into_response(),
        Err(e) => submission_error_response(e, CONTACT_FAILURE),
    }
}

pub(super) async fn evaluation_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let form: EvaluationForm = match parse_body(&body) {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let store = state.store.clone();
    match run_blocking(move || submit_evaluation(store.as_ref(), &form)).await {
        Ok(receipt) => Json(json!({
            "success": true,
            "message": "Evaluation submitted successfully",
            "leadId": receipt.lead_id,
            "evaluationId": receipt.evaluation_id,
            "preview": receipt.preview,
        }))
        .into_response(),
        Err(e) => submission_error_response(e, EVALUATION_FAILURE),
    }
}
