//! Workflow definition types.
//!
//! A [`PipelineDefinition`] is one discovered workflow file: where it lives,
//! what it calls itself, and the raw trigger declaration for every event it
//! listens to. Raw declarations stay unnormalized until the detector needs
//! them.

use serde::{Deserialize, Serialize};

/// Raw, dynamically shaped trigger declaration for a single event.
///
/// Only [`crate::filters::normalize`] looks inside this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TriggerValue {
    #[default]
    Null,
    Scalar(String),
    List(Vec<TriggerValue>),
    /// Key/value pairs in declaration order.
    Mapping(Vec<(String, TriggerValue)>),
}

impl TriggerValue {
    /// Build a mapping from string pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TriggerValue)>,
    {
        TriggerValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list of scalars.
    pub fn list<S, I>(items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        TriggerValue::List(
            items
                .into_iter()
                .map(|s| TriggerValue::Scalar(s.into()))
                .collect(),
        )
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        TriggerValue::Scalar(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TriggerValue::Null)
    }

    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TriggerValue::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_yaml::Value> for TriggerValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => TriggerValue::Null,
            Value::Bool(b) => TriggerValue::Scalar(b.to_string()),
            Value::Number(n) => TriggerValue::Scalar(n.to_string()),
            Value::String(s) => TriggerValue::Scalar(s),
            Value::Sequence(items) => {
                TriggerValue::List(items.into_iter().map(TriggerValue::from).collect())
            }
            Value::Mapping(map) => TriggerValue::Mapping(
                map.into_iter()
                    .filter_map(|(k, v)| {
                        let key = TriggerValue::from(k);
                        key.as_scalar()
                            .map(|k| (k.to_string(), TriggerValue::from(v)))
                    })
                    .collect(),
            ),
            Value::Tagged(tagged) => TriggerValue::from(tagged.value),
        }
    }
}

/// One workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDefinition {
    /// Repository-relative path with forward slashes.
    pub path: String,
    /// Declared `name`, if any.
    pub name: Option<String>,
    /// Declared events and their raw declarations, in declaration order.
    pub events: Vec<(String, TriggerValue)>,
}

impl PipelineDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>, value: TriggerValue) -> Self {
        self.events.push((event.into(), value));
        self
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(name, _)| name.as_str())
    }

    /// Declared name, or the file's base name without its `.yml`/`.yaml`
    /// suffix.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        let base = self.path.rsplit('/').next().unwrap_or(&self.path);
        let base = base.strip_suffix(".yml").unwrap_or(base);
        base.strip_suffix(".yaml").unwrap_or(base).to_string()
    }
}

/// A workflow that should run for the current event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub path: String,
    pub events: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_declared_name() {
        let def = PipelineDefinition::new(".github/workflows/manual.yml").with_name("manual");
        assert_eq!(def.display_name(), "manual");
    }

    #[test]
    fn test_display_name_falls_back_to_file_stem() {
        let yml = PipelineDefinition::new(".github/workflows/release.yml");
        let yaml = PipelineDefinition::new(".github/workflows/nested/lint.yaml");
        assert_eq!(yml.display_name(), "release");
        assert_eq!(yaml.display_name(), "lint");
    }

    #[test]
    fn test_yaml_value_conversion() {
        let value: serde_yaml::Value = serde_yaml::from_str(
            "branches: [main, 10]\ntypes: opened\npaths-ignore:\nenabled: true\n",
        )
        .unwrap();
        let converted = TriggerValue::from(value);
        assert_eq!(
            converted,
            TriggerValue::mapping([
                ("branches", TriggerValue::list(["main", "10"])),
                ("types", TriggerValue::scalar("opened")),
                ("paths-ignore", TriggerValue::Null),
                ("enabled", TriggerValue::scalar("true")),
            ])
        );
    }
}
