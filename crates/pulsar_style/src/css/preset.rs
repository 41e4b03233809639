//! Theme supplied named values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named theme value such as a spacing size or a color.
///
/// Mirrors the objects found in `theme.json` presets, `slug` and `name` are pulled out and every
/// other field is kept in `values`.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Preset {
    /// The identifier used in class names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// A fallback identifier, used when there is no slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Every other field of the preset
    #[serde(flatten)]
    pub values: IndexMap<String, serde_json::Value>,
}

impl Preset {
    /// Create a preset with the given slug
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a extra string field
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// The identifier of this preset, the slug if present otherwise the name.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.slug.as_deref().or(self.name.as_deref())
    }

    /// Get a extra field as a string, numbers are formatted.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            serde_json::Value::String(value) => Some(value.clone()),
            serde_json::Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_wins_over_name() {
        let preset = Preset::new("small").with_name("Small");
        assert_eq!(preset.identifier(), Some("small"));

        let preset = Preset {
            name: Some("Large".into()),
            ..Preset::default()
        };
        assert_eq!(preset.identifier(), Some("Large"));
        assert_eq!(Preset::default().identifier(), None);
    }

    #[test]
    fn deserializes_theme_json_entry() -> serde_json::Result<()> {
        let preset: Preset =
            serde_json::from_str(r#"{"slug": "40", "name": "Medium", "size": "1.5rem", "order": 2}"#)?;
        assert_eq!(preset.slug.as_deref(), Some("40"));
        assert_eq!(preset.value("size").as_deref(), Some("1.5rem"));
        assert_eq!(preset.value("order").as_deref(), Some("2"));
        assert_eq!(preset.value("missing"), None);
        Ok(())
    }
}
