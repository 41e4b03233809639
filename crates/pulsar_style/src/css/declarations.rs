//! Css declaration blocks

use std::fmt::Write;

use indexmap::IndexMap;

use super::ToCss;
use super::sanitize::strip_tags;
use crate::error_handling::log_or_panic_result;

/// An ordered set of `property: value` pairs.
///
/// Properties keep the order they were first added in, re-adding a property overwrites its value
/// in place.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Declarations {
    /// The declarations in insertion order
    entries: IndexMap<String, String>,
}

impl Declarations {
    /// Create a empty declaration set
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, see [`Declarations::insert`].
    #[inline]
    pub fn add(mut self, property: &str, value: &str) -> Self {
        self.insert(property, value);
        self
    }

    /// Add every declaration in order.
    pub fn add_all<P, V>(mut self, declarations: impl IntoIterator<Item = (P, V)>) -> Self
    where
        P: AsRef<str>,
        V: AsRef<str>,
    {
        for (property, value) in declarations {
            self.insert(property.as_ref(), value.as_ref());
        }
        self
    }

    /// Remove a declaration, see [`Declarations::delete`].
    #[inline]
    pub fn remove(mut self, property: &str) -> Self {
        self.delete(property);
        self
    }

    /// Set `property` to `value`.
    ///
    /// Tags are stripped from the property and both sides are trimmed.
    /// If either side ends up empty nothing is added.
    pub fn insert(&mut self, property: &str, value: &str) -> &mut Self {
        let property = strip_tags(property);
        let property = property.trim();
        let value = value.trim();

        if property.is_empty() || value.is_empty() {
            log::debug!("Dropping empty declaration {property:?}: {value:?}");
            return self;
        }

        self.entries.insert(property.to_owned(), value.to_owned());
        self
    }

    /// Delete `property` if present.
    pub fn delete(&mut self, property: &str) -> &mut Self {
        self.entries.shift_remove(property);
        self
    }

    /// Get the value of `property`
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries.get(property).map(String::as_str)
    }

    /// Iterate the declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_str()))
    }

    /// The number of declarations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no declarations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ToCss for Declarations {
    fn to_css(&self) -> String {
        let mut result = String::new();
        for (property, value) in &self.entries {
            if !result.is_empty() {
                result.push(' ');
            }
            let res = write!(&mut result, "{property}: {value};");
            log_or_panic_result!(res, "Failed to write to string (???).");
        }
        result
    }
}

impl<P: AsRef<str>, V: AsRef<str>> FromIterator<(P, V)> for Declarations {
    fn from_iter<T: IntoIterator<Item = (P, V)>>(iter: T) -> Self {
        Self::new().add_all(iter)
    }
}

impl<P: AsRef<str>, V: AsRef<str>, const N: usize> From<[(P, V); N]> for Declarations {
    fn from(value: [(P, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl From<IndexMap<String, String>> for Declarations {
    fn from(value: IndexMap<String, String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Vec<(String, String)>> for Declarations {
    fn from(value: Vec<(String, String)>) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(Declarations::new().to_css(), "");
    }

    #[test]
    fn renders_in_insertion_order() {
        let declarations = Declarations::new()
            .add("display", "flex")
            .add("gap", " 1rem ")
            .add("top", "0");
        assert_eq!(declarations.to_css(), "display: flex; gap: 1rem; top: 0;");
    }

    #[test]
    fn last_write_wins() {
        let declarations = Declarations::new().add("color", "red").add("color", "blue");
        assert_eq!(declarations.to_css(), "color: blue;");
        assert_eq!(declarations.len(), 1);
    }

    #[test]
    fn overwrite_keeps_position() {
        let declarations = Declarations::from([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(declarations.to_css(), "a: 3; b: 2;");
    }

    #[test]
    fn property_is_sanitized() {
        let declarations = Declarations::new().add(" <b>color</b> ", "red");
        assert_eq!(declarations.get("color"), Some("red"));
        assert!(Declarations::new().add("<br>", "red").is_empty());
    }

    #[test]
    fn remove_is_noop_when_missing() {
        let declarations = Declarations::from([("top", "0")]).remove("left");
        assert_eq!(declarations.to_css(), "top: 0;");
        assert!(declarations.remove("top").is_empty());
    }

    #[test]
    fn custom_properties_are_kept() {
        let declarations = Declarations::new().add("--icon", "url(\"x\")");
        assert_eq!(declarations.to_css(), "--icon: url(\"x\");");
    }

    proptest! {
        #[test]
        fn blank_values_are_ignored(property in "[a-z-]{1,12}", value in "[ \t\n]*") {
            let before = Declarations::from([("top", "0")]);
            let after = before.clone().add(&property, &value);
            prop_assert_eq!(before.to_css(), after.to_css());
        }

        #[test]
        fn rendered_pairs_match_len(pairs in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{1,8}"), 0..10)) {
            let declarations: Declarations = pairs.into_iter().collect();
            prop_assert_eq!(declarations.to_css().matches(';').count(), declarations.len());
        }
    }
}
