//! Command handlers.

use crate::config::{DetectConfig, text, workspace_root};
use crate::context::build_event_context;
use crate::inputs::parse_modified_files;
use crate::output::{self, OutputFormat};
use anyhow::Context;
use console::style;
use std::path::PathBuf;
use tripline_core::MatchResult;
use tripline_core::detector::{DefinitionReport, evaluate_all};
use tripline_core::workflows::load_definitions;

/// Detect triggered workflows, report them, and export outputs.
pub fn detect(config: &DetectConfig) -> anyhow::Result<()> {
    let modified = parse_modified_files(&text(&config.modified_files))
        .context("parse modified files")?;
    let ctx = build_event_context(config).context("build event context")?;

    let root = config.workspace_root();
    let definitions = load_definitions(&root)?;
    let reports = evaluate_all(&definitions, &ctx, &modified)?;
    let matches: Vec<MatchResult> = reports.iter().filter_map(DefinitionReport::to_match).collect();

    if config.explain {
        eprint!("{}", explain(&reports));
    }

    match config.format {
        OutputFormat::Text => print!("{}", output::render_text(&matches)),
        OutputFormat::Json => println!("{}", output::summary_json(&matches)?),
    }

    if let Some(path) = config.output_file() {
        output::export_outputs(path, &matches).context("export outputs")?;
    }

    Ok(())
}

/// One line per evaluated declaration, with the rejection reason if any.
fn explain(reports: &[DefinitionReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for verdict in &report.verdicts {
            let mark = if verdict.evaluation.matched {
                style("✓").green()
            } else {
                style("✗").red()
            };
            let reason = verdict.evaluation.reason.as_deref().unwrap_or_default();
            out.push_str(&format!("{} {} [{}] {}\n", mark, report.path, verdict.event, reason));
        }
    }
    out
}

/// List every discovered workflow with its declared events.
pub fn list(workspace: Option<PathBuf>) -> anyhow::Result<()> {
    let root = workspace_root(&workspace);
    let definitions = load_definitions(&root)?;

    if definitions.is_empty() {
        println!("{} No workflows found under {}", style("i").blue(), root.display());
        return Ok(());
    }

    for def in &definitions {
        let events: Vec<&str> = def.event_names().collect();
        println!(
            "{} ({}) on {}",
            style(def.display_name()).bold(),
            def.path,
            events.join(", ")
        );
    }
    Ok(())
}
