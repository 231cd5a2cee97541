//! Match aggregation across workflow definitions.

use crate::context::EventContext;
use crate::error::{Error, Result};
use crate::filters::normalize;
use crate::paths::normalize_paths;
use crate::pipeline::{MatchResult, PipelineDefinition};
use crate::triggers::{Evaluation, TriggerMatcher};

/// Per-event evaluation detail for one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventVerdict {
    pub event: String,
    pub evaluation: Evaluation,
}

/// Evaluate every declaration of `def` whose event name equals the context's
/// event. Declarations for other events are skipped.
pub fn evaluate_definition(
    def: &PipelineDefinition,
    ctx: &EventContext,
    files: &[String],
) -> Vec<EventVerdict> {
    let matcher = TriggerMatcher::new();
    def.events
        .iter()
        .filter(|(event, _)| *event == ctx.name)
        .map(|(event, raw)| {
            let filters = normalize(raw);
            let evaluation = matcher.evaluate(event, &filters, ctx, files);
            match &evaluation.reason {
                None => tracing::debug!(workflow = %def.path, event = %event, "trigger matched"),
                Some(reason) => {
                    tracing::debug!(workflow = %def.path, event = %event, %reason, "trigger skipped")
                }
            }
            EventVerdict {
                event: event.clone(),
                evaluation,
            }
        })
        .collect()
}

/// Every verdict for one definition, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionReport {
    pub name: String,
    pub path: String,
    pub verdicts: Vec<EventVerdict>,
}

impl DefinitionReport {
    /// The match entry for this definition, if any of its events fired.
    pub fn to_match(&self) -> Option<MatchResult> {
        let events: Vec<String> = self
            .verdicts
            .iter()
            .filter(|v| v.evaluation.matched)
            .map(|v| v.event.clone())
            .collect();
        if events.is_empty() {
            return None;
        }
        Some(MatchResult {
            name: self.name.clone(),
            path: self.path.clone(),
            events,
        })
    }
}

/// Event names of `def` that fire for this context and file set.
pub fn matching_events(
    def: &PipelineDefinition,
    ctx: &EventContext,
    files: &[String],
) -> Vec<String> {
    evaluate_definition(def, ctx, files)
        .into_iter()
        .filter(|v| v.evaluation.matched)
        .map(|v| v.event)
        .collect()
}

/// Evaluate every definition once and keep the per-event verdicts.
///
/// Changed files are normalized and deduplicated before evaluation.
pub fn evaluate_all<S: AsRef<str>>(
    definitions: &[PipelineDefinition],
    ctx: &EventContext,
    changed_files: &[S],
) -> Result<Vec<DefinitionReport>> {
    if ctx.name.is_empty() {
        return Err(Error::MissingEventContext);
    }

    let files = normalize_paths(changed_files);
    let reports: Vec<DefinitionReport> = definitions
        .iter()
        .map(|def| DefinitionReport {
            name: def.display_name(),
            path: def.path.clone(),
            verdicts: evaluate_definition(def, ctx, &files),
        })
        .collect();

    tracing::debug!(
        event = %ctx.name,
        definitions = definitions.len(),
        files = files.len(),
        "evaluation complete"
    );
    Ok(reports)
}

/// Return the workflows that should run, in input order.
pub fn detect<S: AsRef<str>>(
    definitions: &[PipelineDefinition],
    ctx: &EventContext,
    changed_files: &[S],
) -> Result<Vec<MatchResult>> {
    let matches: Vec<MatchResult> = evaluate_all(definitions, ctx, changed_files)?
        .iter()
        .filter_map(DefinitionReport::to_match)
        .collect();
    tracing::debug!(event = %ctx.name, matched = matches.len(), "detection complete");
    Ok(matches)
}
