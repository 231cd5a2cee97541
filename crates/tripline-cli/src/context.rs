//! Event context construction from configuration and the event payload.

use crate::config::{DetectConfig, text};
use serde::Deserialize;
use std::path::Path;
use tripline_core::EventContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventPayload {
    action: Option<String>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    repository: Option<RepositoryPayload>,
    pull_request: Option<PullRequestPayload>,
    merge_group: Option<MergeGroupPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RepositoryPayload {
    default_branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestPayload {
    base: Option<BranchPayload>,
    head: Option<BranchPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BranchPayload {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MergeGroupPayload {
    base_ref: Option<String>,
    head_ref: Option<String>,
}

/// Build the event context for this run.
///
/// Fails only when no event name is available.
pub fn build_event_context(config: &DetectConfig) -> tripline_core::Result<EventContext> {
    let mut ctx = EventContext::new(text(&config.event_name))?
        .with_ref(text(&config.git_ref))
        .with_base_ref(text(&config.base_ref))
        .with_head_ref(text(&config.head_ref))
        .with_default_branch(text(&config.default_branch));

    if let Some(path) = config.event_path() {
        match read_payload(path) {
            Ok(payload) => apply_payload(&mut ctx, &payload),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "ignoring event payload"),
        }
    }

    let action = text(&config.action);
    if !action.is_empty() {
        ctx.action = action;
    }

    tracing::debug!(?ctx, "resolved event context");
    Ok(ctx)
}

fn read_payload(path: &Path) -> anyhow::Result<EventPayload> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn set_if_present(field: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *field = value;
    }
}

fn apply_payload(ctx: &mut EventContext, payload: &EventPayload) {
    set_if_present(&mut ctx.action, payload.action.clone());
    set_if_present(
        &mut ctx.default_branch,
        payload
            .repository
            .as_ref()
            .and_then(|r| r.default_branch.clone()),
    );

    match ctx.name.as_str() {
        "pull_request" | "pull_request_target" => {
            if let Some(pr) = &payload.pull_request {
                set_if_present(
                    &mut ctx.base_ref,
                    pr.base.as_ref().and_then(|b| b.git_ref.clone()),
                );
                set_if_present(
                    &mut ctx.head_ref,
                    pr.head.as_ref().and_then(|h| h.git_ref.clone()),
                );
            }
        }
        "merge_group" => {
            if let Some(group) = &payload.merge_group {
                set_if_present(&mut ctx.base_ref, group.base_ref.clone());
                set_if_present(&mut ctx.head_ref, group.head_ref.clone());
            }
        }
        "push" => set_if_present(&mut ctx.git_ref, payload.git_ref.clone()),
        _ => {}
    }
}
