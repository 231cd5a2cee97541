//! Path normalization for changed files and path patterns.

use std::collections::HashSet;

/// Normalize a path or path pattern to a repository-relative, forward-slash
/// form: backslashes become slashes, surrounding whitespace is trimmed, and
/// any leading `./` and `/` runs are stripped.
pub fn normalize_path(path: &str) -> String {
    let slashed = path.trim().replace('\\', "/");
    let mut norm = slashed.as_str();
    while let Some(rest) = norm.strip_prefix("./") {
        norm = rest;
    }
    norm.trim_start_matches('/').to_string()
}

/// Normalize a list of changed files, dropping empties and duplicates.
///
/// The first occurrence of each path wins and input order is kept.
pub fn normalize_paths<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(files.len());
    for file in files {
        let norm = normalize_path(file.as_ref());
        if norm.is_empty() {
            continue;
        }
        if seen.insert(norm.clone()) {
            out.push(norm);
        }
    }
    out
}
