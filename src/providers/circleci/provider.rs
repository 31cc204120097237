use log::info;

use crate::auth::Token;
use crate::error::Result;
use crate::output::Spinner;

use super::client::CircleCiClient;
use super::types::{decode_projects, decode_variables, Project, ProjectRef, Variable};

/// Typed CircleCI operations used by the command layer.
///
/// Each method issues exactly one request and awaits it before returning,
/// so at most one call is ever in flight.
pub struct CircleCiProvider {
    client: CircleCiClient,
}

impl CircleCiProvider {
    /// Creates a provider talking to `base_url` (e.g. <https://circleci.com/api/v1.1>).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        let client = CircleCiClient::new(base_url, token)?;
        Ok(Self { client })
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        info!("Fetching followed projects");
        let spinner = Spinner::start("Fetching projects");

        let body = self.client.get(self.client.projects_url()).await;
        spinner.finish();

        let projects = decode_projects(&body?)?;
        info!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    pub async fn list_variables(&self, project: &ProjectRef) -> Result<Vec<Variable>> {
        info!(
            "Fetching environment variables for {}/{}/{}",
            project.vcs, project.username, project.project
        );
        let spinner = Spinner::start("Fetching environment variables");

        let body = self.client.get(self.client.envvars_url(project)).await;
        spinner.finish();

        let variables = decode_variables(&body?)?;
        info!("Fetched {} variables", variables.len());
        Ok(variables)
    }

    /// Delete a variable by name. A variable that does not exist is not an
    /// error.
    pub async fn delete_variable(&self, project: &ProjectRef, name: &str) -> Result<()> {
        info!("Deleting variable {name} from {}", project.project);
        let spinner = Spinner::start(format!("Deleting {name}"));

        let result = self.client.delete(self.client.envvar_url(project, name)).await;
        spinner.finish();

        result.map(|_| ())
    }

    pub async fn add_variable(&self, project: &ProjectRef, variable: &Variable) -> Result<()> {
        info!("Adding variable {} to {}", variable.name, project.project);
        let spinner = Spinner::start(format!("Adding {}", variable.name));

        let result = self
            .client
            .post(self.client.envvars_url(project), variable)
            .await;
        spinner.finish();

        result.map(|_| ())
    }

    /// The API has no update for variables: delete by name, then add.
    pub async fn upsert_variable(&self, project: &ProjectRef, variable: &Variable) -> Result<()> {
        self.delete_variable(project, &variable.name).await?;
        self.add_variable(project, variable).await
    }
}
