use serde::{Deserialize, Serialize};

/// Why a directory could not be listed.
///
/// The browser shows these inline and otherwise treats every variant the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ListingError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("host error: {0}")]
    Host(String),
}

impl ListingError {
    pub fn from_io(path: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
            _ => Self::Host(format!("{path}: {err}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("invalid base path: {0:?}")]
    InvalidBasePath(String),

    #[error("no tokio runtime: {0}")]
    Runtime(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments for {command}: {reason}")]
    InvalidArgs { command: String, reason: String },

    #[error("{0}")]
    General(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
