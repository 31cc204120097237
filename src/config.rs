use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://circleci.com/api/v1.1";
pub const DEFAULT_VCS: &str = "github";

/// Configuration file structure for wakka.
///
/// Holds defaults for values that would otherwise have to be passed on every
/// run. The API token is never read from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub circleci: CircleCiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CircleCiConfig {
    /// CircleCI API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// VCS type (github or bitbucket)
    #[serde(default = "default_vcs")]
    pub vcs: String,

    /// Account or organisation name
    pub username: Option<String>,

    /// Default project (repository) name
    pub project: Option<String>,
}

impl Default for CircleCiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vcs: default_vcs(),
            username: None,
            project: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_vcs() -> String {
    DEFAULT_VCS.to_string()
}

/// Effective settings for one run, after flags and environment variables
/// have been layered over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub vcs: String,
    pub username: Option<String>,
    pub project: Option<String>,
}

/// Values taken from the command line (flag or its environment variable).
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub vcs: Option<String>,
    pub username: Option<String>,
    pub project: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./wakka.toml
    /// 3. ./wakka.json
    /// 4. ./wakka.yaml
    /// 5. ./wakka.yml
    /// 6. `<user config dir>/wakka/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["wakka.toml", "wakka.json", "wakka.yaml", "wakka.yml"]
            .into_iter()
            .map(PathBuf::from)
            .chain(dirs::config_dir().map(|dir| dir.join("wakka").join("config.toml")));

        for candidate in candidates {
            if candidate.exists() {
                log::debug!("Loading config from {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Layer command-line values over this config. Empty strings count as
    /// unset.
    pub fn settings(&self, overrides: Overrides) -> Settings {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        Settings {
            base_url: non_empty(overrides.base_url)
                .unwrap_or_else(|| self.circleci.base_url.clone()),
            vcs: non_empty(overrides.vcs).unwrap_or_else(|| self.circleci.vcs.clone()),
            username: non_empty(overrides.username)
                .or_else(|| non_empty(self.circleci.username.clone())),
            project: non_empty(overrides.project)
                .or_else(|| non_empty(self.circleci.project.clone())),
        }
    }
}
