use serde::Deserialize;

use super::null_as_default;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Integration the project was imported from, e.g. `github` or `cli`.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub browse_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}
