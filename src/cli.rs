use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, Overrides, Settings};
use crate::error::{Result, WakkaError};
use crate::output;
use crate::providers::circleci::{CircleCiProvider, ProjectRef, Variable};

/// Flags that consume the following argument as their value.
const VALUE_FLAGS: [&str; 8] = [
    "username", "vcs", "base-url", "config", "token", "project", "name", "value",
];

#[derive(Parser, Debug)]
#[command(name = "wakka")]
#[command(about = "CircleCI projects and environment variables", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(long)]
    version: bool,

    /// CircleCI user or organisation name
    #[arg(long, global = true, env = "CIRCLECI_USERNAME")]
    username: Option<String>,

    /// VCS type [github|bitbucket]
    #[arg(long, global = true, env = "CIRCLECI_VCS")]
    vcs: Option<String>,

    /// CircleCI API base URL
    #[arg(long, global = true, env = "CIRCLECI_BASE_URL")]
    base_url: Option<String>,

    /// Path to a wakka config file
    #[arg(long, global = true, env = "WAKKA_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "CIRCLECI_TOKEN", hide = true, hide_env_values = true)]
    token: Option<Token>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List projects with their latest master build
    Projects,

    /// Manage Project Environment Variables
    Variables(VariablesArgs),

    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug)]
struct VariablesArgs {
    /// Project (repository) name
    #[arg(long, env = "CIRCLECI_PROJECT")]
    project: Option<String>,

    /// Add variable
    #[arg(long)]
    add: bool,

    /// Delete variable
    #[arg(long)]
    del: bool,

    /// Variable name
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    name: String,

    /// Variable value
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    value: String,
}

/// What a single run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListProjects,
    ListVariables(ProjectRef),
    /// Delete-then-add, then list
    AddVariable(ProjectRef, Variable),
    /// Delete, then list
    DeleteVariable(ProjectRef, String),
}

/// Rewrite Go-style single-dash long flags (`-project x`, `-name=FOO`) to
/// the `--flag` form clap expects.
///
/// Single-letter flags such as `-h`, values of flags that take one, and
/// everything after a bare `--` are left alone.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    let mut expects_value = false;

    for (index, arg) in args.into_iter().map(Into::into).enumerate() {
        if index == 0 || passthrough || expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }

        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let long_name = arg
            .strip_prefix("--")
            .or_else(|| single_dash_long_flag(&arg))
            .map(str::to_owned);

        match long_name {
            Some(name) => {
                expects_value = !name.contains('=') && VALUE_FLAGS.contains(&name.as_str());
                normalized.push(format!("--{name}"));
            }
            None => normalized.push(arg),
        }
    }

    normalized
}

fn single_dash_long_flag(arg: &str) -> Option<&str> {
    let rest = arg.strip_prefix('-')?;
    let name = rest.split('=').next().unwrap_or_default();
    let is_flag = !rest.starts_with('-')
        && name.len() > 1
        && name.starts_with(|c: char| c.is_ascii_alphabetic());
    is_flag.then_some(rest)
}

fn unknown_command(words: &[String]) -> WakkaError {
    WakkaError::UnknownCommand(words.first().cloned().unwrap_or_default())
}

fn required(value: Option<&String>, prompt: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| WakkaError::MissingRequiredFlag(prompt.to_string()))
}

impl VariablesArgs {
    fn intent(&self, settings: &Settings) -> Result<Intent> {
        if (self.add || self.del) && self.name.is_empty() {
            return Err(WakkaError::MissingRequiredFlag(
                "Please supply the variable name using -name option.".to_string(),
            ));
        }
        if self.add && self.value.is_empty() {
            return Err(WakkaError::MissingRequiredFlag(
                "Please supply the variable value using -value option.".to_string(),
            ));
        }

        let project = ProjectRef {
            vcs: settings.vcs.clone(),
            username: required(
                settings.username.as_ref(),
                "Please supply the CircleCI user name using -username option or `CIRCLECI_USERNAME` environment variable.",
            )?,
            project: required(
                settings.project.as_ref(),
                "Please supply the project name using -project option or `CIRCLECI_PROJECT` environment variable.",
            )?,
        };

        let intent = if self.add {
            Intent::AddVariable(
                project,
                Variable {
                    name: self.name.clone(),
                    value: self.value.clone(),
                },
            )
        } else if self.del {
            Intent::DeleteVariable(project, self.name.clone())
        } else {
            Intent::ListVariables(project)
        };

        Ok(intent)
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let project = match &self.command {
            Some(Commands::Variables(args)) => args.project.clone(),
            _ => None,
        };

        Overrides {
            base_url: self.base_url.clone(),
            vcs: self.vcs.clone(),
            username: self.username.clone(),
            project,
        }
    }

    /// Resolve the subcommand. `None` means no subcommand was given.
    pub fn intent(&self, settings: &Settings) -> Result<Option<Intent>> {
        match &self.command {
            None => Ok(None),
            Some(Commands::Projects) => Ok(Some(Intent::ListProjects)),
            Some(Commands::Variables(args)) => args.intent(settings).map(Some),
            Some(Commands::External(words)) => Err(unknown_command(words)),
        }
    }

    pub async fn execute(&self) -> Result<()> {
        if self.version {
            output::print_version();
            return Ok(());
        }

        let token = self
            .token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or(WakkaError::MissingCredential)?;

        // Usage and unknown commands never depend on the config file
        match &self.command {
            None => {
                output::print_usage();
                return Ok(());
            }
            Some(Commands::External(words)) => return Err(unknown_command(words)),
            Some(_) => {}
        }

        let config = Config::load(self.config.as_deref())
            .map_err(|e| WakkaError::Config(format!("{e:#}")))?;
        let settings = config.settings(self.overrides());

        let Some(intent) = self.intent(&settings)? else {
            output::print_usage();
            return Ok(());
        };

        let provider = CircleCiProvider::new(&settings.base_url, token)?;
        run(&provider, intent).await
    }
}

async fn run(provider: &CircleCiProvider, intent: Intent) -> Result<()> {
    let project = match intent {
        Intent::ListProjects => {
            let projects = provider.list_projects().await?;
            output::print_projects(&projects);
            return Ok(());
        }
        Intent::ListVariables(project) => project,
        Intent::DeleteVariable(project, name) => {
            provider.delete_variable(&project, &name).await?;
            project
        }
        Intent::AddVariable(project, variable) => {
            provider.upsert_variable(&project, &variable).await?;
            project
        }
    };

    // Always show the state the server reports after any mutation
    let variables = provider.list_variables(&project).await?;
    output::print_variables(&variables);
    Ok(())
}
