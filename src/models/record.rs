use serde::{Serialize, Serializer};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl Severity {
    /// Case-insensitive; anything outside the four Snyk levels is `Unknown`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()).as_deref() {
            Some("low") => Severity::Low,
            Some("medium") => Severity::Medium,
            Some("high") => Severity::High,
            Some("critical") => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
            Severity::Unknown => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
            Severity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Priority score column. Written as the number when present and as
/// `Unknown` otherwise; `Unknown` orders below every numeric score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    Unknown,
}

impl Score {
    pub fn cmp_for_sort(&self, other: &Score) -> Ordering {
        match (self, other) {
            (Score::Value(a), Score::Value(b)) => a.total_cmp(b),
            (Score::Value(_), Score::Unknown) => Ordering::Greater,
            (Score::Unknown, Score::Value(_)) => Ordering::Less,
            (Score::Unknown, Score::Unknown) => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for Score {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Score::Value(v),
            _ => Score::Unknown,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{}", v),
            Score::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// One row of the fixable-issues report. Field order is the CSV column order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    #[serde(rename = "ISSUE_SEVERITY_RANK")]
    pub severity_rank: u8,
    #[serde(rename = "ISSUE_SEVERITY", serialize_with = "serialize_display")]
    pub severity: Severity,
    #[serde(rename = "SCORE")]
    pub score: Score,
    #[serde(rename = "PROBLEM_TITLE")]
    pub problem_title: String,
    #[serde(rename = "CVE")]
    pub cve: String,
    #[serde(rename = "CVE_URL")]
    pub cve_url: String,
    #[serde(rename = "CWE")]
    pub cwe: String,
    #[serde(rename = "PROJECT_NAME")]
    pub project_name: String,
    #[serde(rename = "PROJECT_URL")]
    pub project_url: String,
    #[serde(rename = "EXPLOIT_MATURITY")]
    pub exploit_maturity: String,
    #[serde(rename = "AUTOFIXABLE")]
    pub autofixable: String,
    #[serde(rename = "FIRST_INTRODUCED")]
    pub first_introduced: String,
    #[serde(rename = "PRODUCT_NAME")]
    pub product_name: String,
    #[serde(rename = "ISSUE_URL")]
    pub issue_url: String,
    #[serde(rename = "ISSUE_STATUS_INDICATOR")]
    pub issue_status: String,
    #[serde(rename = "ISSUE_TYPE")]
    pub issue_type: String,
}

pub const REPORT_COLUMNS: [&str; 16] = [
    "ISSUE_SEVERITY_RANK",
    "ISSUE_SEVERITY",
    "SCORE",
    "PROBLEM_TITLE",
    "CVE",
    "CVE_URL",
    "CWE",
    "PROJECT_NAME",
    "PROJECT_URL",
    "EXPLOIT_MATURITY",
    "AUTOFIXABLE",
    "FIRST_INTRODUCED",
    "PRODUCT_NAME",
    "ISSUE_URL",
    "ISSUE_STATUS_INDICATOR",
    "ISSUE_TYPE",
];
