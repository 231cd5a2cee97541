//! Normalization of raw trigger declarations into [`FilterRecord`]s.

use crate::paths::normalize_path;
use crate::pipeline::TriggerValue;
use serde::{Deserialize, Serialize};

/// Canonical filter lists for one event declaration.
///
/// Every list is trimmed and free of empty entries. An empty list means the
/// dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterRecord {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub branches_ignore: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub paths_ignore: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tags_ignore: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl FilterRecord {
    /// True when no list constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.branches.is_empty()
            && self.branches_ignore.is_empty()
            && self.paths.is_empty()
            && self.paths_ignore.is_empty()
            && self.tags.is_empty()
            && self.tags_ignore.is_empty()
            && self.types.is_empty()
    }
}

/// Convert a raw declaration into a [`FilterRecord`].
///
/// - null: nothing is constrained
/// - scalar or list: shorthand for `types`
/// - mapping: recognized keys (case-insensitive) fill their lists, other
///   keys are ignored
pub fn normalize(raw: &TriggerValue) -> FilterRecord {
    let mut record = FilterRecord::default();

    match raw {
        TriggerValue::Null => {}
        TriggerValue::Scalar(_) | TriggerValue::List(_) => {
            record.types = patterns(raw);
        }
        TriggerValue::Mapping(entries) => {
            for (key, value) in entries {
                match key.to_ascii_lowercase().as_str() {
                    "branches" => record.branches = patterns(value),
                    "branches-ignore" => record.branches_ignore = patterns(value),
                    "paths" => record.paths = path_patterns(value),
                    "paths-ignore" => record.paths_ignore = path_patterns(value),
                    "tags" => record.tags = patterns(value),
                    "tags-ignore" => record.tags_ignore = patterns(value),
                    "types" => record.types = patterns(value),
                    _ => {}
                }
            }
        }
    }

    record
}

/// Coerce a value to a string list. Nested lists and mappings inside a list
/// have no string form and are dropped, as are null items.
fn string_list(value: &TriggerValue) -> Vec<&str> {
    match value {
        TriggerValue::Null | TriggerValue::Mapping(_) => Vec::new(),
        TriggerValue::Scalar(s) => vec![s.as_str()],
        TriggerValue::List(items) => items.iter().filter_map(TriggerValue::as_scalar).collect(),
    }
}

fn patterns(value: &TriggerValue) -> Vec<String> {
    string_list(value)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn path_patterns(value: &TriggerValue) -> Vec<String> {
    string_list(value)
        .into_iter()
        .map(normalize_path)
        .filter(|s| !s.is_empty())
        .collect()
}
