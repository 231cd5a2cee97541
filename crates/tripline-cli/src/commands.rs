//! CLI command definitions.

use crate::config::DetectConfig;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Detect workflows triggered by the current event
    Detect(DetectConfig),

    /// List discovered workflows and the events they declare
    List {
        /// Repository root
        #[arg(long, env = "GITHUB_WORKSPACE")]
        workspace: Option<PathBuf>,
    },
}
