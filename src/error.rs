use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NuvcError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("No workspace folder is open")]
    NoWorkspace,

    #[error("Failed to update '{}': {source}", path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry lookup failed: {0}")]
    Registry(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid panel message: {0}")]
    Protocol(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NuvcError {
    /// Errors that should be shown as a notice rather than a failure.
    pub fn is_notice(&self) -> bool {
        matches!(self, NuvcError::NoWorkspace | NuvcError::UserCancelled)
    }
}

pub type Result<T> = std::result::Result<T, NuvcError>;
