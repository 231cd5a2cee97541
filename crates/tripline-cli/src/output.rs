//! Reporting and output persistence.

use clap::ValueEnum;
use console::style;
use std::io::Write;
use std::path::Path;
use tripline_core::MatchResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON array of `{name, path, events}` objects.
pub fn summary_json(matches: &[MatchResult]) -> serde_json::Result<String> {
    serde_json::to_string(matches)
}

/// Human-readable report.
pub fn render_text(matches: &[MatchResult]) -> String {
    if matches.is_empty() {
        return "No workflows match the current event and modified files.\n".to_string();
    }

    let mut out = format!("Detected {} workflows to run:\n", matches.len());
    for m in matches {
        out.push_str(&format!(
            " - {} ({}) via {}\n",
            style(&m.name).bold(),
            m.path,
            m.events.join(", ")
        ));
    }
    out
}

/// Append `workflows` and `count` to a GitHub-style output file.
pub fn export_outputs(path: &Path, matches: &[MatchResult]) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    write_output(&mut file, "workflows", &summary_json(matches)?)?;
    write_output(&mut file, "count", &matches.len().to_string())?;
    Ok(())
}

fn write_output(w: &mut impl Write, name: &str, value: &str) -> std::io::Result<()> {
    write!(w, "{}<<EOF\n{}\nEOF\n", name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<MatchResult> {
        vec![MatchResult {
            name: "ci".to_string(),
            path: ".github/workflows/ci.yml".to_string(),
            events: vec!["push".to_string()],
        }]
    }

    #[test]
    fn test_summary_json() {
        assert_eq!(
            summary_json(&sample()).unwrap(),
            r#"[{"name":"ci","path":".github/workflows/ci.yml","events":["push"]}]"#
        );
        assert_eq!(summary_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_render_text() {
        console::set_colors_enabled(false);
        assert_eq!(
            render_text(&[]),
            "No workflows match the current event and modified files.\n"
        );
        assert_eq!(
            render_text(&sample()),
            "Detected 1 workflows to run:\n - ci (.github/workflows/ci.yml) via push\n"
        );
    }

    #[test]
    fn test_export_outputs_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").unwrap();

        export_outputs(&path, &sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            concat!(
                "previous=1\n",
                "workflows<<EOF\n",
                r#"[{"name":"ci","path":".github/workflows/ci.yml","events":["push"]}]"#,
                "\nEOF\n",
                "count<<EOF\n1\nEOF\n",
            )
        );
    }
}
