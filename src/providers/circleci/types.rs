use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Placeholder shown when a project has no builds on its default branch.
pub const NOT_AVAILABLE: &str = "N/A";

/// A CircleCI project with the latest build on its `master` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Repository name, taken from the last segment of the VCS URL
    pub name: String,
    /// First entry of the API's `recent_builds` list, if any
    pub latest_build: Option<Build>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub number: u64,
    pub status: String,
}

impl Project {
    pub fn build_number_label(&self) -> String {
        self.latest_build
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |b| b.number.to_string())
    }

    pub fn status_label(&self) -> &str {
        self.latest_build
            .as_ref()
            .map_or(NOT_AVAILABLE, |b| b.status.as_str())
    }
}

/// A project environment variable.
///
/// The API masks secret values in list responses, so `value` is whatever
/// the server chose to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// Addresses a single project in the API path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub vcs: String,
    pub username: String,
    pub project: String,
}

/// Treat an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct ProjectResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    vcs_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    branches: BranchesResponse,
}

#[derive(Deserialize, Default)]
struct BranchesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    master: BranchResponse,
}

#[derive(Deserialize, Default)]
struct BranchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    recent_builds: Vec<BuildResponse>,
}

#[derive(Deserialize, Default)]
struct BuildResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    build_num: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
}

impl From<ProjectResponse> for Project {
    fn from(response: ProjectResponse) -> Self {
        let latest_build = response
            .branches
            .master
            .recent_builds
            .into_iter()
            .next()
            .map(|build| Build {
                number: build.build_num,
                status: build.status,
            });

        Self {
            name: project_name(&response.vcs_url).to_string(),
            latest_build,
        }
    }
}

/// Text after the final `/` of a VCS URL, ignoring trailing slashes.
fn project_name(vcs_url: &str) -> &str {
    let trimmed = vcs_url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Decode a `/projects` response body.
pub fn decode_projects(bytes: &[u8]) -> Result<Vec<Project>> {
    let projects: Vec<ProjectResponse> = serde_json::from_slice(bytes)?;
    Ok(projects.into_iter().map(Project::from).collect())
}

/// Decode an `/envvar` list response body.
pub fn decode_variables(bytes: &[u8]) -> Result<Vec<Variable>> {
    Ok(serde_json::from_slice(bytes)?)
}
