//! YAML frontmatter for blog posts.
//!
//! A post file starts with a `---` fenced YAML block followed by the markdown
//! body:
//!
//! ```text
//! ---
//! title: Why Your Automations Keep Breaking
//! date: 2025-01-15
//! category: automation
//! tags: [zapier, monitoring]
//! ---
//! Body text...
//! ```

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_case_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `Some(false)` marks a draft. Absent means published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostFrontmatter {
    pub fn is_published(&self) -> bool {
        self.published != Some(false)
    }

    /// Publish date as a calendar date. Accepts `YYYY-MM-DD` or RFC 3339.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
    }
}

/// Split a post file into its raw YAML block and the body that follows it.
pub fn split_frontmatter(raw: &str) -> Result<(&str, &str), ContentError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rest = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))
        .ok_or(ContentError::MissingFrontmatter)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }
    Err(ContentError::MissingFrontmatter)
}

/// Parse frontmatter and return it with the markdown body.
pub fn parse_post(raw: &str) -> Result<(PostFrontmatter, &str), ContentError> {
    let (yaml, body) = split_frontmatter(raw)?;
    let frontmatter: PostFrontmatter = serde_yaml::from_str(yaml)?;
    Ok((frontmatter, body))
}
