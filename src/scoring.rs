//! Operating-system scan scoring.
//!
//! Five 0–5 sub-scores are summed into a total out of 25. The respondent's
//! self-reported mode is kept as the category unless the total contradicts it:
//!
//! - "growth" with a total under 10 is reclassified as "firefighting"
//! - "firefighting" with a total of 18 or more is reclassified as "growth"
//!
//! Any sub-score of 2 or less is reported as a bottleneck, weakest first, at
//! most three of them. Everything here is pure; persistence lives in
//! `services::evaluation`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Five questions, five points each.
pub const MAX_SCORE: u32 = 25;

/// Self-reported growth below this total is reclassified as firefighting.
pub const GROWTH_FLOOR: u32 = 10;

/// Self-reported firefighting at or above this total is reclassified as growth.
pub const FIREFIGHTING_CEILING: u32 = 18;

/// Highest sub-score an area can have and still count as a bottleneck.
pub const BOTTLENECK_THRESHOLD: u8 = 2;

/// Largest valid answer to a single scan question.
pub const MAX_SUBSCORE: u8 = 5;

const MAX_BOTTLENECKS: usize = 3;

// ---------------------------------------------------------------------------
// Mode / category
// ---------------------------------------------------------------------------

/// Self-reported operating mode, which doubles as the result category.
///
/// Free text is accepted and passed through untouched; only the two known
/// values take part in reclassification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    Firefighting,
    Growth,
    Other(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Firefighting => "firefighting",
            Mode::Growth => "growth",
            Mode::Other(s) => s,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Other(String::new())
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "firefighting" => Mode::Firefighting,
            "growth" => Mode::Growth,
            _ => Mode::Other(value),
        }
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        Mode::from(value.to_string())
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Areas and answers
// ---------------------------------------------------------------------------

/// The five scanned areas, in the order they are asked (and tie-broken).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Clarity,
    Process,
    Tools,
    Automation,
    Measurement,
}

impl Area {
    pub const ALL: [Area; 5] = [
        Area::Clarity,
        Area::Process,
        Area::Tools,
        Area::Automation,
        Area::Measurement,
    ];

    /// Human-readable area name shown in bottleneck lists.
    pub fn label(self) -> &'static str {
        match self {
            Area::Clarity => "Clarity & Goals",
            Area::Process => "Processes & SOPs",
            Area::Tools => "Tools & Data",
            Area::Automation => "Automation & AI",
            Area::Measurement => "Measurement",
        }
    }

    /// Request field carrying this area's answer.
    pub fn field_name(self) -> &'static str {
        match self {
            Area::Clarity => "clarityScore",
            Area::Process => "processScore",
            Area::Tools => "toolsScore",
            Area::Automation => "automationScore",
            Area::Measurement => "measurementScore",
        }
    }
}

/// Raw scan answers. `None` means the question was left unanswered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanAnswers {
    pub clarity: Option<u8>,
    pub process: Option<u8>,
    pub tools: Option<u8>,
    pub automation: Option<u8>,
    pub measurement: Option<u8>,
}

impl ScanAnswers {
    pub fn new(scores: [u8; 5]) -> Self {
        let [clarity, process, tools, automation, measurement] = scores;
        Self {
            clarity: Some(clarity),
            process: Some(process),
            tools: Some(tools),
            automation: Some(automation),
            measurement: Some(measurement),
        }
    }

    pub fn get(&self, area: Area) -> Option<u8> {
        match area {
            Area::Clarity => self.clarity,
            Area::Process => self.process,
            Area::Tools => self.tools,
            Area::Automation => self.automation,
            Area::Measurement => self.measurement,
        }
    }
}

/// Sub-scores after coercion (unanswered → 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsScores {
    pub clarity: u8,
    pub process: u8,
    pub tools: u8,
    pub automation: u8,
    pub measurement: u8,
}

impl OsScores {
    pub fn get(&self, area: Area) -> u8 {
        match area {
            Area::Clarity => self.clarity,
            Area::Process => self.process,
            Area::Tools => self.tools,
            Area::Automation => self.automation,
            Area::Measurement => self.measurement,
        }
    }

    pub fn total(&self) -> u32 {
        Area::ALL.iter().map(|a| u32::from(self.get(*a))).sum()
    }
}

impl From<&ScanAnswers> for OsScores {
    fn from(answers: &ScanAnswers) -> Self {
        Self {
            clarity: answers.clarity.unwrap_or(0),
            process: answers.process.unwrap_or(0),
            tools: answers.tools.unwrap_or(0),
            automation: answers.automation.unwrap_or(0),
            measurement: answers.measurement.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    /// 0 and 1 are critical, 2 is a warning.
    pub fn for_score(score: u8) -> Self {
        if score <= 1 {
            Severity::Critical
        } else {
            Severity::Warning
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub area: String,
    pub score: u8,
    pub severity: Severity,
    /// Set when the score is the default for a skipped question rather
    /// than an answer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unanswered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub os_scores: OsScores,
    pub total_score: u32,
    pub max_score: u32,
    pub category: Mode,
    pub bottlenecks: Vec<Bottleneck>,
}

/// Everything the scorer reads from a questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub scan: ScanAnswers,
    pub mode: Mode,
    /// Free text such as "about 20 hours"; only the first integer matters.
    pub hours_per_week: String,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Score a questionnaire. Total over its input; never fails.
///
/// Sub-scores are summed as given: range enforcement belongs to the caller
/// (see `forms::EvaluationForm::validate`).
pub fn score(submission: &Submission) -> ScoringResult {
    let os_scores = OsScores::from(&submission.scan);
    let total_score = os_scores.total();

    ScoringResult {
        os_scores,
        total_score,
        max_score: MAX_SCORE,
        category: classify(&submission.mode, total_score),
        bottlenecks: bottlenecks(&submission.scan),
    }
}

/// Reclassify a self-reported mode against the scan total.
pub fn classify(mode: &Mode, total: u32) -> Mode {
    match mode {
        Mode::Growth if total < GROWTH_FLOOR => Mode::Firefighting,
        Mode::Firefighting if total >= FIREFIGHTING_CEILING => Mode::Growth,
        other => other.clone(),
    }
}

/// Weakest areas first, ties in question order, at most three.
pub fn bottlenecks(scan: &ScanAnswers) -> Vec<Bottleneck> {
    let mut found: Vec<Bottleneck> = Area::ALL
        .iter()
        .filter_map(|&area| {
            let raw = scan.get(area);
            let score = raw.unwrap_or(0);
            (score <= BOTTLENECK_THRESHOLD).then(|| Bottleneck {
                area: area.label().to_string(),
                score,
                severity: Severity::for_score(score),
                unanswered: raw.is_none(),
            })
        })
        .collect();

    // sort_by_key is stable, so equal scores keep question order.
    found.sort_by_key(|b| b.score);
    found.truncate(MAX_BOTTLENECKS);
    found
}

fn leading_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// First run of digits in free text, or 0 when there is none.
pub fn parse_hours(text: &str) -> u32 {
    leading_integer()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Advisory value label for the lead record. Not part of the score.
pub fn estimate_value(submission: &Submission) -> String {
    let hours = parse_hours(&submission.hours_per_week);
    if hours >= 15 {
        return format!("{}+ hrs/week of manual work", hours);
    }
    if hours >= 5 {
        return format!("{} hrs/week optimization opportunity", hours);
    }
    match submission.mode {
        Mode::Firefighting => "Significant reliability improvements".to_string(),
        _ => "Scalability improvements".to_string(),
    }
}
