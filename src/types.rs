use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.leadsite/config.json
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Falls back to `~/.leadsite/leadsite.db` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default = "default_site_description")]
    pub site_description: String,
    /// Request body cap for the form endpoints.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: None,
            content_dir: default_content_dir(),
            site_url: default_site_url(),
            site_title: default_site_title(),
            site_description: default_site_description(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content/blog")
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_site_title() -> String {
    "Blog".to_string()
}

fn default_site_description() -> String {
    "Notes on automation, operations, and AI tooling".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

// =============================================================================
// Lead classification
// =============================================================================

/// Which form first created a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    ContactForm,
    Evaluation,
}

impl LeadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::ContactForm => "contact_form",
            LeadSource::Evaluation => "evaluation",
        }
    }

    /// Inquiry type recorded for a new lead when the form has none.
    /// Completing an evaluation implies interest in client work.
    pub fn default_inquiry_type(self) -> Option<InquiryType> {
        match self {
            LeadSource::ContactForm => None,
            LeadSource::Evaluation => Some(InquiryType::ClientProject),
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InquiryType {
    #[serde(rename = "Client Project")]
    ClientProject,
    #[serde(rename = "Job Opportunity")]
    JobOpportunity,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl InquiryType {
    pub const ALL: [InquiryType; 3] = [
        InquiryType::ClientProject,
        InquiryType::JobOpportunity,
        InquiryType::GeneralInquiry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryType::ClientProject => "Client Project",
            InquiryType::JobOpportunity => "Job Opportunity",
            InquiryType::GeneralInquiry => "General Inquiry",
        }
    }

    /// Exact, case-sensitive match against the wire labels.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ContactFormSubmitted,
    EvaluationCompleted,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::ContactFormSubmitted => "contact_form_submitted",
            ActivityType::EvaluationCompleted => "evaluation_completed",
        }
    }
}
