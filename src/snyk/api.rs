use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AggregatedIssue, Organization, Project};

/// The three Snyk resources the report walks.
#[async_trait]
pub trait SnykApi: Send + Sync {
    async fn list_organizations(&self) -> Result<Vec<Organization>>;
    async fn list_projects(&self, org: &Organization) -> Result<Vec<Project>>;
    async fn aggregated_issues(
        &self,
        org: &Organization,
        project: &Project,
    ) -> Result<Vec<AggregatedIssue>>;
}
