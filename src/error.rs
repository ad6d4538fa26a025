//! Error types for branch-sync

use thiserror::Error;

/// Errors produced while reconciling branches and pull requests
#[derive(Debug, Error)]
pub enum Error {
    /// A branch the run depends on does not exist on the remote
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Branch creation was rejected because the ref already exists
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Branch creation failed for any other reason
    #[error("failed to create branch '{name}': {message}")]
    BranchCreation {
        /// Branch that could not be created
        name: String,
        /// Platform error message
        message: String,
    },

    /// Merging one branch into another did not succeed
    #[error("failed to merge '{head}' into '{base}': {message}")]
    MergeConflict {
        /// Branch receiving the merge
        base: String,
        /// Branch being merged in
        head: String,
        /// Platform error message
        message: String,
    },

    /// The push event payload is missing or unusable
    #[error("invalid push event: {0}")]
    EventParse(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// PR title/body template failed to compile or render
    #[error("template error: {0}")]
    Template(String),

    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure
    #[error("platform error: {0}")]
    Platform(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(format!(
                "{} ({})",
                source.message,
                source.status_code.as_u16()
            )),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
