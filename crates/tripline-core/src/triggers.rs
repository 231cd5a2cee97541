//! Trigger evaluation.
//!
//! Decides whether one declared event of a workflow fires for the current
//! [`EventContext`] and changed files. Each event name falls into an
//! [`EventFamily`] that fixes which filters apply.

use crate::context::EventContext;
use crate::filters::FilterRecord;
use crate::patterns::PatternSet;
use serde::{Deserialize, Serialize};

const HEADS_PREFIX: &str = "refs/heads/";
const TAGS_PREFIX: &str = "refs/tags/";

/// Filtering semantics shared by a group of event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    /// `pull_request`, `pull_request_target`, `merge_group`: types, base
    /// branch and paths.
    PullRequest,
    /// `push`: branch or tag from the ref, then paths.
    Push,
    /// Everything else: types only.
    Generic,
}

impl EventFamily {
    pub fn of(event: &str) -> Self {
        match event {
            "pull_request" | "pull_request_target" | "merge_group" => EventFamily::PullRequest,
            "push" => EventFamily::Push,
            _ => EventFamily::Generic,
        }
    }
}

/// What a push ref points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget<'a> {
    Branch(&'a str),
    Tag(&'a str),
}

/// Split a ref into a branch or tag name. Anything that is neither
/// `refs/heads/...` nor `refs/tags/...` is taken as a bare branch name.
pub fn split_ref(git_ref: &str) -> RefTarget<'_> {
    if let Some(branch) = git_ref.strip_prefix(HEADS_PREFIX) {
        RefTarget::Branch(branch)
    } else if let Some(tag) = git_ref.strip_prefix(TAGS_PREFIX) {
        RefTarget::Tag(tag)
    } else {
        RefTarget::Branch(git_ref.trim())
    }
}

/// Outcome of evaluating one event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub matched: bool,
    /// Why the first failing check rejected the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Evaluation {
    pub fn matched() -> Self {
        Self {
            matched: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), String>> for Evaluation {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Evaluation::matched(),
            Err(reason) => Evaluation::rejected(reason),
        }
    }
}

/// Matcher for deciding whether a declared event fires.
#[derive(Debug, Clone, Copy)]
pub struct TriggerMatcher;

impl TriggerMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one event declaration, explaining a rejection.
    pub fn evaluate(
        &self,
        event: &str,
        filters: &FilterRecord,
        ctx: &EventContext,
        files: &[String],
    ) -> Evaluation {
        let result = match EventFamily::of(event) {
            EventFamily::PullRequest => self.pull_request_matches(filters, ctx, files),
            EventFamily::Push => self.push_matches(filters, ctx, files),
            EventFamily::Generic => self.types_match(&filters.types, &ctx.action),
        };
        result.into()
    }

    fn pull_request_matches(
        &self,
        filters: &FilterRecord,
        ctx: &EventContext,
        files: &[String],
    ) -> Result<(), String> {
        self.types_match(&filters.types, &ctx.action)?;
        self.branch_matches(&filters.branches, &filters.branches_ignore, &ctx.base_ref)?;
        self.paths_match(&filters.paths, &filters.paths_ignore, files)
    }

    fn push_matches(
        &self,
        filters: &FilterRecord,
        ctx: &EventContext,
        files: &[String],
    ) -> Result<(), String> {
        match split_ref(&ctx.git_ref) {
            RefTarget::Tag(tag) => self.tag_matches(&filters.tags, &filters.tags_ignore, tag)?,
            RefTarget::Branch(branch) => {
                self.branch_matches(&filters.branches, &filters.branches_ignore, branch)?
            }
        }
        self.paths_match(&filters.paths, &filters.paths_ignore, files)
    }

    fn types_match(&self, types: &[String], action: &str) -> Result<(), String> {
        if types.is_empty() {
            return Ok(());
        }
        if action.is_empty() {
            return Err("no event action available to evaluate `types`".to_string());
        }
        if types.iter().any(|t| t.trim().eq_ignore_ascii_case(action)) {
            Ok(())
        } else {
            Err(format!(
                "action `{}` is not one of `types` [{}]",
                action,
                types.join(", ")
            ))
        }
    }

    fn branch_matches(
        &self,
        include: &[String],
        exclude: &[String],
        branch: &str,
    ) -> Result<(), String> {
        if include.is_empty() && exclude.is_empty() {
            return Ok(()); // No branch filtering
        }
        if branch.is_empty() {
            return Err("branch information unavailable to evaluate branch filters".to_string());
        }

        let mut candidates = vec![branch.to_string()];
        if !branch.starts_with(HEADS_PREFIX) {
            candidates.push(format!("{}{}", HEADS_PREFIX, branch));
        }

        let include = PatternSet::new(include);
        if !include.is_empty() && !candidates.iter().any(|c| include.is_match(c)) {
            return Err(format!("branch `{}` did not satisfy `branches`", branch));
        }
        let exclude = PatternSet::new(exclude);
        if candidates.iter().any(|c| exclude.is_match(c)) {
            return Err(format!("branch `{}` was excluded by `branches-ignore`", branch));
        }
        Ok(())
    }

    fn tag_matches(&self, include: &[String], exclude: &[String], tag: &str) -> Result<(), String> {
        let include = PatternSet::new(include);
        if !include.is_empty() && !include.is_match(tag) {
            return Err(format!("tag `{}` did not satisfy `tags`", tag));
        }
        if PatternSet::new(exclude).is_match(tag) {
            return Err(format!("tag `{}` was excluded by `tags-ignore`", tag));
        }
        Ok(())
    }

    fn paths_match(
        &self,
        include: &[String],
        exclude: &[String],
        changed: &[String],
    ) -> Result<(), String> {
        if include.is_empty() && exclude.is_empty() {
            return Ok(()); // No path filtering
        }
        let include = PatternSet::new(include);
        let exclude = PatternSet::new(exclude);

        if !include.is_empty() {
            return if changed
                .iter()
                .any(|path| include.is_match(path) && !exclude.is_match(path))
            {
                Ok(())
            } else {
                Err("no changed files satisfied `paths`".to_string())
            };
        }

        // Ignore-only: nothing changed means nothing to veto.
        if changed.is_empty() || changed.iter().any(|path| !exclude.is_match(path)) {
            Ok(())
        } else {
            Err("all changed files were ignored by `paths-ignore`".to_string())
        }
    }
}

impl Default for TriggerMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate one event declaration with the default matcher.
pub fn evaluate(
    event: &str,
    filters: &FilterRecord,
    ctx: &EventContext,
    files: &[String],
) -> Evaluation {
    TriggerMatcher::new().evaluate(event, filters, ctx, files)
}

/// Whether the declared event fires for this context and file set.
pub fn should_trigger(
    event: &str,
    filters: &FilterRecord,
    ctx: &EventContext,
    files: &[String],
) -> bool {
    evaluate(event, filters, ctx, files).matched
}
