use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::json;

use crate::config::DEFAULT_API_URL;
use crate::error::{Error, Result};
use crate::models::{
    AggregatedIssue, AggregatedIssuesResponse, Organization, OrganizationsResponse, Project,
    ProjectsResponse,
};
use crate::snyk::api::SnykApi;

pub struct SnykClient {
    client: Client,
    base_url: String,
}

impl SnykClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("token {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("snyk-report/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_status(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited(retry_after));
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized(format!(
                "Failed to fetch {}: {} - {}",
                what, status, body
            ))),
            s if s.is_server_error() => Err(Error::Server(
                s.as_u16(),
                format!("Failed to fetch {}: {}", what, body),
            )),
            _ => Err(Error::SnykApi(format!(
                "Failed to fetch {}: {} - {}",
                what, status, body
            ))),
        }
    }
}

#[async_trait]
impl SnykApi for SnykClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let url = format!("{}/orgs", self.base_url);
        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, "organizations").await?;
        let body: OrganizationsResponse = response.json().await?;
        Ok(body.orgs)
    }

    async fn list_projects(&self, org: &Organization) -> Result<Vec<Project>> {
        let url = format!("{}/org/{}/projects", self.base_url, org.id);
        tracing::debug!("Fetching: {}", url);

        let response = self.client.post(&url).json(&json!({})).send().await?;
        let response =
            Self::check_status(response, &format!("projects for org {}", org.name)).await?;
        let body: ProjectsResponse = response.json().await?;
        Ok(body.projects)
    }

    async fn aggregated_issues(
        &self,
        org: &Organization,
        project: &Project,
    ) -> Result<Vec<AggregatedIssue>> {
        let url = format!(
            "{}/org/{}/project/{}/aggregated-issues",
            self.base_url, org.id, project.id
        );
        tracing::debug!("Fetching: {}", url);

        let request_body = json!({
            "includeDescription": false,
            "includeIntroducedThrough": false,
            "filters": {
                "severities": ["critical", "high", "medium", "low"],
                "types": ["vuln", "license"],
                "ignored": false,
                "patched": false
            }
        });

        let response = self.client.post(&url).json(&request_body).send().await?;
        let response =
            Self::check_status(response, &format!("issues for project {}", project.name)).await?;
        let body: AggregatedIssuesResponse = response.json().await?;
        Ok(body.issues)
    }
}
