//! Run configuration, read once from flags and environment.

use crate::output::OutputFormat;
use clap::Args;
use std::path::{Path, PathBuf};

/// Inputs for a detection run.
#[derive(Debug, Clone, Default, Args)]
pub struct DetectConfig {
    /// Changed files, as a JSON array or comma/newline separated text
    #[arg(long, env = "INPUT_MODIFIED_FILES")]
    pub modified_files: Option<String>,

    /// Event name, e.g. push or pull_request
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Full git ref, e.g. refs/heads/main
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Base branch for pull request events
    #[arg(long, env = "GITHUB_BASE_REF")]
    pub base_ref: Option<String>,

    /// Head branch for pull request events
    #[arg(long, env = "GITHUB_HEAD_REF")]
    pub head_ref: Option<String>,

    /// Repository default branch
    #[arg(long, env = "GITHUB_DEFAULT_BRANCH")]
    pub default_branch: Option<String>,

    /// Event action, overriding the payload
    #[arg(long, env = "INPUT_ACTION")]
    pub action: Option<String>,

    /// Path to the event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository root (defaults to the current directory)
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// File that receives `workflows` and `count` outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, env = "TRIPLINE_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print why each declared event did or did not fire
    #[arg(long)]
    pub explain: bool,
}

/// Trimmed value of an optional string input; empty when unset.
pub fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

/// Repository root: the configured workspace, else the current directory.
pub fn workspace_root(workspace: &Option<PathBuf>) -> PathBuf {
    if let Some(root) = non_empty(workspace) {
        return root.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl DetectConfig {
    pub fn workspace_root(&self) -> PathBuf {
        workspace_root(&self.workspace)
    }

    pub fn event_path(&self) -> Option<&Path> {
        non_empty(&self.event_path)
    }

    pub fn output_file(&self) -> Option<&Path> {
        non_empty(&self.output_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims() {
        assert_eq!(text(&Some("  push \n".to_string())), "push");
        assert_eq!(text(&None), "");
    }

    #[test]
    fn test_empty_paths_are_unset() {
        let config = DetectConfig {
            event_path: Some(PathBuf::new()),
            output_file: Some(PathBuf::from("/tmp/out")),
            workspace: Some(PathBuf::from("/repo")),
            ..Default::default()
        };
        assert!(config.event_path().is_none());
        assert_eq!(config.output_file(), Some(Path::new("/tmp/out")));
        assert_eq!(config.workspace_root(), PathBuf::from("/repo"));
    }
}
