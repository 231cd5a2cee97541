//! Discovery and parsing of workflow definition files.

use crate::error::{Error, Result};
use crate::pipeline::{PipelineDefinition, TriggerValue};
use serde_yaml::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Conventional location of workflow files, relative to the repository root.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Whether a file name looks like a workflow definition.
pub fn is_workflow_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".yml") || lower.ends_with(".yaml")
}

/// Load every workflow definition under `<repo_root>/.github/workflows`.
///
/// A missing directory yields no definitions. Files are visited in lexical
/// order so the result is stable across runs.
pub fn load_definitions(repo_root: &Path) -> Result<Vec<PipelineDefinition>> {
    let dir = repo_root.join(WORKFLOWS_DIR);
    match std::fs::metadata(&dir) {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %dir.display(), "no workflows directory");
            return Ok(Vec::new());
        }
        Err(source) => return Err(Error::DefinitionRead { path: dir, source }),
    }

    let mut files = Vec::new();
    collect_files(&dir, &mut files)?;

    let mut definitions = Vec::with_capacity(files.len());
    for file in files {
        let content = std::fs::read_to_string(&file).map_err(|source| Error::DefinitionRead {
            path: file.clone(),
            source,
        })?;
        let rel = relative_path(repo_root, &file);
        definitions.push(parse_definition(&rel, &content)?);
    }

    tracing::info!(
        path = %dir.display(),
        count = definitions.len(),
        "loaded workflow definitions"
    );
    Ok(definitions)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let read_err = |source: std::io::Error| Error::DefinitionRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(read_err)?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if is_workflow_file(&entry.file_name().to_string_lossy()) {
            out.push(path);
        }
    }
    Ok(())
}

fn relative_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse one workflow document into a [`PipelineDefinition`].
///
/// `on` may be a single event name, a list of event names, or a mapping of
/// event name to its declaration. Only YAML syntax errors fail; a document
/// without a usable `on` declares no events and never matches.
pub fn parse_definition(path: &str, content: &str) -> Result<PipelineDefinition> {
    let doc: Value = serde_yaml::from_str(content).map_err(|e| Error::DefinitionParse {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let mut def = PipelineDefinition::new(path);
    let Value::Mapping(root) = doc else {
        tracing::trace!(path, "workflow document is not a mapping");
        return Ok(def);
    };

    if let Some(Value::String(name)) = root.get("name") {
        def.name = Some(name.clone());
    }

    // YAML 1.1 readers can surface a bare `on` key as boolean true.
    let Some(on) = root.get("on").or_else(|| root.get(Value::Bool(true))) else {
        tracing::trace!(path, "workflow has no `on` declaration");
        return Ok(def);
    };

    def.events = match on {
        Value::String(event) => vec![(event.clone(), TriggerValue::Null)],
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|event| (event.to_string(), TriggerValue::Null))
            .collect(),
        Value::Mapping(map) => map
            .iter()
            .filter_map(|(k, v)| {
                k.as_str()
                    .map(|event| (event.to_string(), TriggerValue::from(v.clone())))
            })
            .collect(),
        _ => {
            tracing::trace!(path, "ignoring unusable `on` declaration");
            Vec::new()
        }
    };

    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_workflow_file() {
        assert!(is_workflow_file("ci.yml"));
        assert!(is_workflow_file("CI.YAML"));
        assert!(!is_workflow_file("README.md"));
        assert!(!is_workflow_file("yml"));
    }

    #[test]
    fn test_parse_mapping_on() {
        let def = parse_definition(
            ".github/workflows/pr.yml",
            r#"
name: pull-request-check
on:
  pull_request:
    types: [opened, synchronize]
    branches: [main]
  workflow_dispatch:
jobs: {}
"#,
        )
        .unwrap();

        assert_eq!(def.name.as_deref(), Some("pull-request-check"));
        assert_eq!(
            def.event_names().collect::<Vec<_>>(),
            vec!["pull_request", "workflow_dispatch"]
        );
        assert_eq!(def.events[1].1, TriggerValue::Null);
        assert_eq!(
            def.events[0].1,
            TriggerValue::mapping([
                ("types", TriggerValue::list(["opened", "synchronize"])),
                ("branches", TriggerValue::list(["main"])),
            ])
        );
    }

    #[test]
    fn test_parse_string_and_list_on() {
        let single = parse_definition("a.yml", "on: push\n").unwrap();
        assert_eq!(single.events, vec![("push".to_string(), TriggerValue::Null)]);
        assert_eq!(single.name, None);

        let list = parse_definition("b.yml", "on: [push, pull_request]\n").unwrap();
        assert_eq!(
            list.event_names().collect::<Vec<_>>(),
            vec!["push", "pull_request"]
        );
    }

    #[test]
    fn test_parse_syntax_error() {
        assert!(matches!(
            parse_definition("bad.yml", "on: [push\n"),
            Err(Error::DefinitionParse { path, .. }) if path == "bad.yml"
        ));
    }

    #[test]
    fn test_parse_without_usable_on_declares_nothing() {
        let no_on = parse_definition("no-on.yml", "name: shared\njobs: {}\n").unwrap();
        assert_eq!(no_on.name.as_deref(), Some("shared"));
        assert!(no_on.events.is_empty());

        for content in ["just text\n", "on:\n", "on: 3\n", "[a, b]\n"] {
            let def = parse_definition("odd.yml", content).unwrap();
            assert!(def.events.is_empty(), "{:?}", content);
        }
    }

    #[test]
    fn test_load_keeps_going_past_workflow_without_on() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(WORKFLOWS_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.yml"), "on: push\n").unwrap();
        std::fs::write(dir.join("shared.yml"), "name: shared\njobs: {}\n").unwrap();

        let defs = load_definitions(repo.path()).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].event_names().collect::<Vec<_>>(), vec!["push"]);
        assert!(defs[1].events.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_unreadable_directory_is_an_error() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(WORKFLOWS_DIR);
        std::fs::create_dir_all(dir.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&dir, &dir).unwrap();

        let err = load_definitions(repo.path()).unwrap_err();
        assert!(matches!(err, Error::DefinitionRead { ref path, .. } if *path == dir));
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let repo = tempfile::tempdir().unwrap();
        let defs = load_definitions(repo.path()).unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn test_load_definitions_sorted_and_filtered() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(WORKFLOWS_DIR);
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("b.yml"), "on: push\n").unwrap();
        std::fs::write(dir.join("a.yaml"), "on: push\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a workflow").unwrap();
        std::fs::write(dir.join("nested").join("c.yml"), "on: push\n").unwrap();

        let paths: Vec<String> = load_definitions(repo.path())
            .unwrap()
            .into_iter()
            .map(|d| d.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                ".github/workflows/a.yaml",
                ".github/workflows/b.yml",
                ".github/workflows/nested/c.yml",
            ]
        );
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(WORKFLOWS_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.yml"), "on: [push\n").unwrap();

        let err = load_definitions(repo.path()).unwrap_err();
        assert!(err.to_string().contains(".github/workflows/broken.yml"));
    }
}
