//! Push event payload

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Subset of the platform's push webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Commit SHA the ref points at after the push
    pub after: String,
    /// Full ref that was pushed, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Whether the push deleted the ref
    #[serde(default)]
    pub deleted: bool,
    /// Repository the push happened in
    pub repository: EventRepository,
}

/// Repository section of the push payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    /// Repository name
    pub name: String,
    /// Repository owner
    pub owner: EventOwner,
}

/// Owner section of the push payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventOwner {
    /// Owner login (user or organization)
    pub login: String,
}

impl PushEvent {
    /// Parse a payload from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::EventParse(e.to_string()))
    }

    /// Load the payload from the event file written by the runner
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::EventParse(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Short name of the pushed branch
    ///
    /// Fails for anything that is not a branch ref (tags, notes, ...).
    pub fn branch_name(&self) -> Result<&str> {
        parse_branch_ref(&self.git_ref)
    }
}

/// Strip `refs/heads/` from a ref, rejecting non-branch refs
pub fn parse_branch_ref(git_ref: &str) -> Result<&str> {
    match git_ref.strip_prefix(BRANCH_REF_PREFIX) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::EventParse(format!(
            "ref '{git_ref}' is not a branch (expected {BRANCH_REF_PREFIX}<name>)"
        ))),
    }
}
