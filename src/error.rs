use thiserror::Error;

#[derive(Error, Debug)]
pub enum WakkaError {
    #[error("Please supply the CircleCI Personal Token using `CIRCLECI_TOKEN` environment variable.")]
    MissingCredential,

    #[error("{0}")]
    MissingRequiredFlag(String),

    #[error("{0:?} is not valid command.")]
    UnknownCommand(String),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WakkaError {
    /// Process exit code for this error.
    ///
    /// Missing `-name`/`-value` prompts exit 0 so existing scripts that
    /// probe the tool keep working.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingRequiredFlag(_) => 0,
            Self::UnknownCommand(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WakkaError>;
