use serde::Deserialize;

use super::null_as_default;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedIssue {
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub issue_data: Option<IssueData>,
    #[serde(default)]
    pub fix_info: Option<FixInfo>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl AggregatedIssue {
    pub fn is_fixable(&self) -> bool {
        self.fix_info.as_ref().is_some_and(|f| f.is_fixable)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub identifiers: Option<Identifiers>,
    #[serde(default)]
    pub exploit_maturity: Option<String>,
    #[serde(default)]
    pub publication_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identifiers {
    #[serde(rename = "CVE", default, deserialize_with = "null_as_default")]
    pub cve: Vec<String>,
    #[serde(rename = "CWE", default, deserialize_with = "null_as_default")]
    pub cwe: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_fixable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Priority {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatedIssuesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<AggregatedIssue>,
}
