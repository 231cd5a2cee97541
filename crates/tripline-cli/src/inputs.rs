//! Parsing of the changed-file input.

use anyhow::Context;

/// Parse changed files given either as a JSON array of strings or as comma
/// and newline separated text.
pub fn parse_modified_files(raw: &str) -> anyhow::Result<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    if raw.starts_with('[') {
        return serde_json::from_str(raw).context("modified files is not a JSON array of strings");
    }

    Ok(raw
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
