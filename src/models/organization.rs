use serde::Deserialize;

use super::null_as_default;

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub orgs: Vec<Organization>,
}
