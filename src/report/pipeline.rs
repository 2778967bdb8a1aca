use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::{AggregatedIssue, Organization, Project, ReportRecord};
use crate::report::extractor::extract_records;
use crate::snyk::SnykApi;

/// Result of fetching one project's aggregated issues.
#[derive(Debug)]
pub enum IssueFetch {
    Found(Vec<AggregatedIssue>),
    NoIssues,
    Failed { error: Error, retryable: bool },
}

impl From<Result<Vec<AggregatedIssue>>> for IssueFetch {
    fn from(result: Result<Vec<AggregatedIssue>>) -> Self {
        match result {
            Ok(issues) if issues.is_empty() => IssueFetch::NoIssues,
            Ok(issues) => IssueFetch::Found(issues),
            Err(error) => {
                let retryable = error.is_retryable();
                IssueFetch::Failed { error, retryable }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub organizations_scanned: usize,
    pub organizations_excluded: usize,
    pub projects_scanned: usize,
    pub projects_excluded: usize,
    pub projects_without_issues: usize,
    pub projects_failed: usize,
    pub issues_seen: usize,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct ReportRun {
    pub records: Vec<ReportRecord>,
    pub summary: RunSummary,
}

pub struct ReportPipeline {
    api: Arc<dyn SnykApi>,
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(api: impl SnykApi + 'static, config: ReportConfig) -> Self {
        Self {
            api: Arc::new(api),
            config,
        }
    }

    /// Walks every non-excluded organization and project and collects the
    /// fixable issues. Enumeration failures abort the run; a failed issue
    /// fetch only skips that project.
    pub async fn run(&self) -> Result<ReportRun> {
        let mut summary = RunSummary::default();
        let mut records = Vec::new();

        tracing::info!("Fetching organizations...");
        let organizations = self.api.list_organizations().await?;

        let (excluded, targets): (Vec<Organization>, Vec<Organization>) = organizations
            .into_iter()
            .partition(|org| self.config.is_org_excluded(&org.name));
        summary.organizations_excluded = excluded.len();
        for org in &excluded {
            tracing::info!("Skipping excluded organization: {}", org.name);
        }

        tracing::info!("Found {} organizations to scan", targets.len());

        for org in &targets {
            let projects = self.api.list_projects(org).await?;
            summary.organizations_scanned += 1;
            tracing::info!("Organization {}: {} projects", org.name, projects.len());

            let pb = self.progress_bar(projects.len() as u64, &org.name);
            for project in &projects {
                pb.inc(1);
                if self.config.is_project_excluded(&project.name) {
                    tracing::debug!("Skipping excluded project: {}", project.name);
                    summary.projects_excluded += 1;
                    continue;
                }

                summary.projects_scanned += 1;
                let found = self.collect_project(org, project, &mut summary).await;
                records.extend(found);
            }
            pb.finish_and_clear();
        }

        summary.records = records.len();
        tracing::info!(
            "Scanned {} projects across {} organizations: {} issues, {} fixable ({} projects without issues, {} failed)",
            summary.projects_scanned,
            summary.organizations_scanned,
            summary.issues_seen,
            summary.records,
            summary.projects_without_issues,
            summary.projects_failed
        );

        Ok(ReportRun { records, summary })
    }

    pub async fn fetch_issues(&self, org: &Organization, project: &Project) -> IssueFetch {
        self.api.aggregated_issues(org, project).await.into()
    }

    async fn collect_project(
        &self,
        org: &Organization,
        project: &Project,
        summary: &mut RunSummary,
    ) -> Vec<ReportRecord> {
        match self.fetch_issues(org, project).await {
            IssueFetch::Found(issues) => {
                summary.issues_seen += issues.len();
                let records = extract_records(project, &issues);
                tracing::debug!(
                    "Project {}: {} issues, {} fixable",
                    project.name,
                    issues.len(),
                    records.len()
                );
                records
            }
            IssueFetch::NoIssues => {
                summary.projects_without_issues += 1;
                tracing::debug!("Project {} has no issues", project.name);
                Vec::new()
            }
            IssueFetch::Failed { error, retryable } => {
                summary.projects_failed += 1;
                tracing::debug!(
                    "Skipping project {} (retryable: {}): {}",
                    project.name,
                    retryable,
                    error
                );
                Vec::new()
            }
        }
    }

    fn progress_bar(&self, len: u64, org_name: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} projects {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(org_name.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixInfo, IssueData, Priority};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSnyk {
        organizations: Vec<Organization>,
        fail_organizations: bool,
        projects: HashMap<String, Vec<Project>>,
        failing_project_lists: Vec<String>,
        issues: HashMap<String, Vec<AggregatedIssue>>,
        failing_issue_fetches: Vec<String>,
    }

    #[async_trait]
    impl SnykApi for FakeSnyk {
        async fn list_organizations(&self) -> Result<Vec<Organization>> {
            if self.fail_organizations {
                return Err(Error::Unauthorized("401 Unauthorized".to_string()));
            }
            Ok(self.organizations.clone())
        }

        async fn list_projects(&self, org: &Organization) -> Result<Vec<Project>> {
            if self.failing_project_lists.contains(&org.id) {
                return Err(Error::Server(500, "boom".to_string()));
            }
            Ok(self.projects.get(&org.id).cloned().unwrap_or_default())
        }

        async fn aggregated_issues(
            &self,
            _org: &Organization,
            project: &Project,
        ) -> Result<Vec<AggregatedIssue>> {
            if self.failing_issue_fetches.contains(&project.id) {
                return Err(Error::SnykApi("404 Not Found".to_string()));
            }
            Ok(self.issues.get(&project.id).cloned().unwrap_or_default())
        }
    }

    fn org(id: &str, name: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            origin: Some("github".to_string()),
            browse_url: None,
        }
    }

    fn issue(id: &str, severity: &str, score: f64, fixable: bool) -> AggregatedIssue {
        AggregatedIssue {
            issue_type: Some("vuln".to_string()),
            issue_data: Some(IssueData {
                title: Some(format!("issue {}", id)),
                severity: Some(severity.to_string()),
                ..Default::default()
            }),
            fix_info: Some(FixInfo { is_fixable: fixable }),
            priority: Some(Priority { score: Some(score) }),
        }
    }

    fn config() -> ReportConfig {
        ReportConfig {
            excluded_orgs: vec!["Sandboxes".to_string()],
            excluded_projects: vec!["acme/automation".to_string()],
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_single_fixable_issue_produces_one_record() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Acme")],
            ..Default::default()
        };
        fake.projects.insert("o1".to_string(), vec![project("p1", "acme/web")]);
        fake.issues.insert(
            "p1".to_string(),
            vec![issue("a", "high", 700.0, true), issue("b", "critical", 900.0, false)],
        );

        let run = ReportPipeline::new(fake, config()).run().await.unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].severity_rank, 3);
        assert_eq!(run.records[0].severity.to_string(), "High");
        assert_eq!(run.summary.issues_seen, 2);
        assert_eq!(run.summary.records, 1);
    }

    #[tokio::test]
    async fn test_excluded_organization_contributes_nothing() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Sandboxes"), org("o2", "Acme")],
            ..Default::default()
        };
        fake.projects.insert("o1".to_string(), vec![project("p1", "sandbox/app")]);
        fake.projects.insert("o2".to_string(), vec![project("p2", "acme/web")]);
        fake.issues.insert("p1".to_string(), vec![issue("a", "critical", 900.0, true)]);
        fake.issues.insert("p2".to_string(), vec![issue("b", "low", 100.0, true)]);

        let pipeline = ReportPipeline::new(fake, config());
        let run = pipeline.run().await.unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].project_name, "acme/web");
        assert_eq!(run.summary.organizations_excluded, 1);
        assert_eq!(run.summary.organizations_scanned, 1);
    }

    #[tokio::test]
    async fn test_excluded_project_skipped_in_every_org() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Acme"), org("o2", "Acme Labs")],
            ..Default::default()
        };
        fake.projects.insert(
            "o1".to_string(),
            vec![project("p1", "acme/automation"), project("p2", "acme/web")],
        );
        fake.projects.insert("o2".to_string(), vec![project("p3", "acme/automation")]);
        for id in ["p1", "p2", "p3"] {
            fake.issues.insert(id.to_string(), vec![issue(id, "medium", 400.0, true)]);
        }

        let pipeline = ReportPipeline::new(fake, config());
        let run = pipeline.run().await.unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].project_name, "acme/web");
        assert_eq!(run.summary.projects_excluded, 2);
        assert_eq!(run.summary.projects_scanned, 1);
    }

    #[tokio::test]
    async fn test_failed_issue_fetch_skips_project_and_continues() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Acme")],
            failing_issue_fetches: vec!["p1".to_string()],
            ..Default::default()
        };
        fake.projects.insert(
            "o1".to_string(),
            vec![project("p1", "acme/broken"), project("p2", "acme/empty"), project("p3", "acme/web")],
        );
        fake.issues.insert("p3".to_string(), vec![issue("c", "critical", 850.0, true)]);

        let run = ReportPipeline::new(fake, config()).run().await.unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].project_name, "acme/web");
        assert_eq!(run.summary.projects_failed, 1);
        assert_eq!(run.summary.projects_without_issues, 1);
    }

    #[tokio::test]
    async fn test_organization_enumeration_failure_aborts() {
        let fake = FakeSnyk {
            fail_organizations: true,
            ..Default::default()
        };

        let result = ReportPipeline::new(fake, config()).run().await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_project_enumeration_failure_aborts() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Acme"), org("o2", "Broken")],
            failing_project_lists: vec!["o2".to_string()],
            ..Default::default()
        };
        fake.projects.insert("o1".to_string(), vec![project("p1", "acme/web")]);
        fake.issues.insert("p1".to_string(), vec![issue("a", "high", 700.0, true)]);

        let result = ReportPipeline::new(fake, config()).run().await;
        assert!(matches!(result, Err(Error::Server(500, _))));
    }

    #[tokio::test]
    async fn test_fetch_issues_classifies_outcomes() {
        let mut fake = FakeSnyk {
            failing_issue_fetches: vec!["broken".to_string()],
            ..Default::default()
        };
        fake.issues.insert("p1".to_string(), vec![issue("a", "low", 10.0, false)]);
        let pipeline = ReportPipeline::new(fake, config());
        let acme = org("o1", "Acme");

        assert!(matches!(
            pipeline.fetch_issues(&acme, &project("p1", "acme/web")).await,
            IssueFetch::Found(ref issues) if issues.len() == 1
        ));
        assert!(matches!(
            pipeline.fetch_issues(&acme, &project("empty", "acme/empty")).await,
            IssueFetch::NoIssues
        ));
        assert!(matches!(
            pipeline.fetch_issues(&acme, &project("broken", "acme/broken")).await,
            IssueFetch::Failed { retryable: false, .. }
        ));
    }

    #[test]
    fn test_transient_failures_are_marked_retryable() {
        let outcome = IssueFetch::from(Result::<Vec<AggregatedIssue>>::Err(Error::RateLimited(10)));
        assert!(matches!(outcome, IssueFetch::Failed { retryable: true, .. }));
    }

    #[tokio::test]
    async fn test_no_fixable_issues_yields_empty_run() {
        let mut fake = FakeSnyk {
            organizations: vec![org("o1", "Acme")],
            ..Default::default()
        };
        fake.projects.insert("o1".to_string(), vec![project("p1", "acme/web")]);
        fake.issues.insert("p1".to_string(), vec![issue("a", "high", 700.0, false)]);

        let run = ReportPipeline::new(fake, config()).run().await.unwrap();
        assert!(run.records.is_empty());
        assert_eq!(run.summary.issues_seen, 1);
    }
}
