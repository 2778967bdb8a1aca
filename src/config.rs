use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.snyk.io/v1";
pub const DEFAULT_EXCLUDED_ORG: &str = "Aerospike Sandboxes";
pub const DEFAULT_EXCLUDED_PROJECT: &str = "trusleaf/ecosystem-automation";

#[derive(Debug, Clone)]
pub struct Config {
    pub snyk_token: String,
    pub api_url: String,
    pub excluded_orgs: Vec<String>,
    pub excluded_projects: Vec<String>,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snyk_token = lookup("SNYK_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("SNYK_TOKEN environment variable not set".to_string()))?;

        let api_url = lookup("SNYK_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let excluded_orgs = lookup("SNYK_EXCLUDE_ORGS")
            .map(|v| parse_list(&v))
            .unwrap_or_else(|| vec![DEFAULT_EXCLUDED_ORG.to_string()]);

        let excluded_projects = lookup("SNYK_EXCLUDE_PROJECTS")
            .map(|v| parse_list(&v))
            .unwrap_or_else(|| vec![DEFAULT_EXCLUDED_PROJECT.to_string()]);

        let output_dir = lookup("SNYK_REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            snyk_token,
            api_url,
            excluded_orgs,
            excluded_projects,
            output_dir,
        })
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub excluded_orgs: Vec<String>,
    pub excluded_projects: Vec<String>,
    pub show_progress: bool,
}

impl ReportConfig {
    pub fn is_org_excluded(&self, name: &str) -> bool {
        self.excluded_orgs.iter().any(|excluded| excluded == name)
    }

    pub fn is_project_excluded(&self, name: &str) -> bool {
        self.excluded_projects.iter().any(|excluded| excluded == name)
    }
}

impl From<&Config> for ReportConfig {
    fn from(config: &Config) -> Self {
        Self {
            excluded_orgs: config.excluded_orgs.clone(),
            excluded_projects: config.excluded_projects.clone(),
            show_progress: true,
        }
    }
}
