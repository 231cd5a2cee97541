//! The event context a run is evaluated against.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Describes the triggering occurrence for the current evaluation.
///
/// Built once per run by the caller and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// Event name, e.g. `push` or `pull_request`.
    pub name: String,
    /// Event subtype for events with `types` filters, e.g. `opened`.
    #[serde(default)]
    pub action: String,
    /// Full git ref, e.g. `refs/heads/main` or `refs/tags/v1.0`.
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    /// Base branch for pull request style events.
    #[serde(default)]
    pub base_ref: String,
    /// Head branch for pull request style events.
    #[serde(default)]
    pub head_ref: String,
    /// Repository default branch. Informational only.
    #[serde(default)]
    pub default_branch: String,
}

impl EventContext {
    /// Create a context for the named event.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::MissingEventContext);
        }
        Ok(Self {
            name,
            ..Default::default()
        })
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }

    pub fn with_base_ref(mut self, base_ref: impl Into<String>) -> Self {
        self.base_ref = base_ref.into();
        self
    }

    pub fn with_head_ref(mut self, head_ref: impl Into<String>) -> Self {
        self.head_ref = head_ref.into();
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }
}
