//! Request bodies for the two submission endpoints, and their validation.
//!
//! Fields deserialize leniently: a wrong JSON type is treated as absent so
//! the caller gets a field-level validation message instead of a parse error.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::scoring::{Area, Mode, ScanAnswers, Submission, MAX_SUBSCORE};
use crate::types::InquiryType;
use crate::util::{is_valid_email, non_empty, normalize_email};

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// =============================================================================
// Contact form
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub inquiry_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

/// A contact submission that passed validation, cleaned for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
}

impl ContactForm {
    /// Check every field and collect all messages, in field order.
    pub fn validate(&self) -> Result<ValidContact, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.chars().count() < NAME_MIN_CHARS {
            errors.push(format!("Name must be at least {} characters", NAME_MIN_CHARS));
        }

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if !is_valid_email(email) {
            errors.push("Valid email is required".to_string());
        }

        let inquiry_type = self.inquiry_type.as_deref().and_then(InquiryType::parse);
        if inquiry_type.is_none() {
            errors.push("Valid inquiry type is required".to_string());
        }

        let raw_message = self.message.as_deref().unwrap_or_default();
        let message = raw_message.trim();
        if message.chars().count() < MESSAGE_MIN_CHARS {
            errors.push(format!(
                "Message must be at least {} characters",
                MESSAGE_MIN_CHARS
            ));
        }
        if raw_message.chars().count() > MESSAGE_MAX_CHARS {
            errors.push(format!(
                "Message must be less than {} characters",
                MESSAGE_MAX_CHARS
            ));
        }

        match inquiry_type {
            Some(inquiry_type) if errors.is_empty() => Ok(ValidContact {
                name: name.to_string(),
                email: normalize_email(email),
                company: non_empty(self.company.as_deref()),
                inquiry_type,
                message: message.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Evaluation form
// =============================================================================

/// The self-assessment questionnaire. Everything except name, email and the
/// five scan scores is echoed back and stored, never interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,

    // Business context
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_size: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub revenue_model: Option<String>,

    // Focus area and mode
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode_description: Option<String>,

    // Operating system scan
    #[serde(default, deserialize_with = "lenient_number")]
    pub clarity_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub process_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tools_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub automation_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub measurement_score: Option<f64>,

    // Goals
    #[serde(default, deserialize_with = "lenient_string")]
    pub one_year_outcome: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub primary_kpi: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timeline: Option<String>,

    // Bottleneck workflow
    #[serde(default, deserialize_with = "lenient_string")]
    pub workflow_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub workflow_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hours_per_week: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub people_and_tools: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub failure_modes: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub biggest_frustration: Option<String>,

    // Constraints
    #[serde(default, deserialize_with = "lenient_string")]
    pub data_fragmentation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_integration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub automation_comfort: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub must_remain_human: Option<String>,

    // Next steps
    #[serde(default, deserialize_with = "lenient_string")]
    pub readiness: Option<String>,
}

impl EvaluationForm {
    fn raw_score(&self, area: Area) -> Option<f64> {
        match area {
            Area::Clarity => self.clarity_score,
            Area::Process => self.process_score,
            Area::Tools => self.tools_score,
            Area::Automation => self.automation_score,
            Area::Measurement => self.measurement_score,
        }
    }

    /// Name and email are required; any scan score that is present must be a
    /// whole number from 0 to 5.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if non_empty(self.name.as_deref()).is_none() {
            errors.push("Name is required".to_string());
        }
        match non_empty(self.email.as_deref()) {
            None => errors.push("Email is required".to_string()),
            Some(email) if !is_valid_email(&email) => {
                errors.push("Invalid email format".to_string())
            }
            Some(_) => {}
        }

        for area in Area::ALL {
            if let Some(value) = self.raw_score(area) {
                if value.fract() != 0.0 || value < 0.0 || value > f64::from(MAX_SUBSCORE) {
                    errors.push(format!(
                        "{} must be a whole number from 0 to {}",
                        area.field_name(),
                        MAX_SUBSCORE
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Scan answers for the scorer. Call after `validate`; anything still out
    /// of range is treated as unanswered.
    pub fn scan_answers(&self) -> ScanAnswers {
        let get = |area: Area| {
            self.raw_score(area)
                .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(MAX_SUBSCORE)).contains(v))
                .map(|v| v as u8)
        };
        ScanAnswers {
            clarity: get(Area::Clarity),
            process: get(Area::Process),
            tools: get(Area::Tools),
            automation: get(Area::Automation),
            measurement: get(Area::Measurement),
        }
    }

    pub fn to_submission(&self) -> Submission {
        Submission {
            scan: self.scan_answers(),
            mode: Mode::from(self.mode.as_deref().unwrap_or_default()),
            hours_per_week: self.hours_per_week.clone().unwrap_or_default(),
        }
    }

    pub fn normalized_email(&self) -> String {
        normalize_email(self.email.as_deref().unwrap_or_default())
    }

    pub fn trimmed_name(&self) -> String {
        self.name.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    pub fn company(&self) -> Option<String> {
        non_empty(self.company_name.as_deref())
    }

    /// The echoed answer set as stored on the evaluation row (snake_case keys).
    pub fn answers_json(&self) -> Value {
        json!({
            "company_name": self.company_name,
            "industry": self.industry,
            "company_size": self.company_size,
            "role": self.role,
            "revenue_model": self.revenue_model,
            "focus_area": self.focus_area,
            "mode": self.mode,
            "mode_description": self.mode_description,
            "one_year_outcome": self.one_year_outcome,
            "primary_kpi": self.primary_kpi,
            "timeline": self.timeline,
            "workflow_name": self.workflow_name,
            "workflow_type": self.workflow_type,
            "current_state": self.current_state,
            "frequency": self.frequency,
            "hours_per_week": self.hours_per_week,
            "people_and_tools": self.people_and_tools,
            "failure_modes": self.failure_modes,
            "biggest_frustration": self.biggest_frustration,
            "data_fragmentation": self.data_fragmentation,
            "tool_integration": self.tool_integration,
            "automation_comfort": self.automation_comfort,
            "must_remain_human": self.must_remain_human,
            "readiness": self.readiness,
        })
    }
}
