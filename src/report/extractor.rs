use crate::models::{AggregatedIssue, Identifiers, Project, ReportRecord, Score, Severity};

const CVE_RECORD_URL: &str = "https://www.cve.org/CVERecord?id=";

const NO_CVE: &str = "No CVE Found";
const NO_CVE_URL: &str = "Not Available";
const NO_CWE: &str = "No CWE Found";
const UNKNOWN: &str = "Unknown";
const NO_PROJECT_URL: &str = "URL not available";
const NO_EXPLOIT_DATA: &str = "No data";
const UNKNOWN_PRODUCT: &str = "Unknown Product";
const NO_ISSUE_URL: &str = "Not Available";
const DEFAULT_STATUS: &str = "Open";

/// Flattens every fixable issue of `project` into report rows, keeping
/// the order the API returned them in.
pub fn extract_records(project: &Project, issues: &[AggregatedIssue]) -> Vec<ReportRecord> {
    issues
        .iter()
        .filter_map(|issue| extract_record(project, issue))
        .collect()
}

/// Returns `None` unless the issue carries fix info marking it fixable.
pub fn extract_record(project: &Project, issue: &AggregatedIssue) -> Option<ReportRecord> {
    if !issue.is_fixable() {
        return None;
    }

    let data = issue.issue_data.clone().unwrap_or_default();
    let severity = Severity::parse(data.severity.as_deref());
    let identifiers = data.identifiers.as_ref();

    Some(ReportRecord {
        severity_rank: severity.rank(),
        severity,
        score: Score::from(issue.priority.as_ref().and_then(|p| p.score)),
        problem_title: or_fallback(data.title, UNKNOWN),
        cve: join_or(identifiers.map(|i| i.cve.as_slice()), NO_CVE),
        cve_url: cve_urls(identifiers),
        cwe: join_or(identifiers.map(|i| i.cwe.as_slice()), NO_CWE),
        project_name: project.name.clone(),
        project_url: or_fallback(project.browse_url.clone(), NO_PROJECT_URL),
        exploit_maturity: or_fallback(data.exploit_maturity, NO_EXPLOIT_DATA),
        autofixable: "Fixable".to_string(),
        first_introduced: or_fallback(data.publication_time, UNKNOWN),
        product_name: or_fallback(project.origin.clone(), UNKNOWN_PRODUCT),
        issue_url: or_fallback(data.url, NO_ISSUE_URL),
        issue_status: or_fallback(data.status, DEFAULT_STATUS),
        issue_type: or_fallback(issue.issue_type.clone(), UNKNOWN),
    })
}

fn or_fallback(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Joins with `", "`. An empty list gets the fallback just like a missing
/// one, so an issue that carries an `identifiers` object with no CVEs reads
/// `No CVE Found` rather than a blank cell.
fn join_or(values: Option<&[String]>, fallback: &str) -> String {
    match values {
        Some(values) if !values.is_empty() => values.join(", "),
        _ => fallback.to_string(),
    }
}

fn cve_urls(identifiers: Option<&Identifiers>) -> String {
    match identifiers {
        Some(ids) if !ids.cve.is_empty() => ids
            .cve
            .iter()
            .map(|cve| format!("{}{}", CVE_RECORD_URL, cve))
            .collect::<Vec<_>>()
            .join(", "),
        _ => NO_CVE_URL.to_string(),
    }
}
