//! Accumulate rules into a stylesheet
//!
//! Besides collecting rules, the generator has helpers for the two kinds of generated classes
//! WordPress themes rely on:
//! * utility classes, `.has-x { prop: value !important; }`, one per preset.
//! * container classes, `.wp-container-1`, `.wp-container-2`, ..., one per block instance.

use super::ToCss;
use super::declarations::Declarations;
use super::preset::Preset;
use super::rule::Rule;
use super::sanitize::sanitize_html_class;

/// Placeholder replaced by the preset slug in utility selector patterns
pub const SLUG_PLACEHOLDER: &str = "$slug";
/// Placeholder replaced by the index in container selector patterns
pub const NUMBER_PLACEHOLDER: &str = "$number";

/// Suffix appended to utility values
const IMPORTANT: &str = " !important";

/// An ordered collection of rules
#[derive(Default, Clone, Debug)]
#[must_use]
pub struct StylesheetGenerator {
    /// The rules in append order
    rules: Vec<Rule>,
}

impl StylesheetGenerator {
    /// Create a empty generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Append rules in order
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    /// The collected rules
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of collected rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Are there no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove every rule
    pub fn clear(&mut self) -> &mut Self {
        self.rules.clear();
        self
    }

    /// Render every rule in order.
    ///
    /// When not `minified` every rule is followed by a newline.
    #[must_use]
    pub fn render(&self, minified: bool) -> String {
        let mut css = String::new();
        for rule in &self.rules {
            css.push_str(&rule.to_css());
            if !minified {
                css.push('\n');
            }
        }
        css
    }

    /// Build a utility class rule, marking every value `!important` if requested.
    ///
    /// ```rust
    /// # use pulsar_style::prelude::*;
    /// let rule = StylesheetGenerator::utility_rule(".has-x", [("top", "1px")], true);
    /// assert_eq!(rule.to_css(), ".has-x { top: 1px !important; }");
    /// ```
    pub fn utility_rule<P, V>(
        selector: impl Into<String>,
        declarations: impl IntoIterator<Item = (P, V)>,
        important: bool,
    ) -> Rule
    where
        P: AsRef<str>,
        V: AsRef<str>,
    {
        let declarations: Declarations = declarations
            .into_iter()
            .map(|(property, value)| {
                let value = value.as_ref();
                let value = if important && !value.trim().is_empty() {
                    format!("{}{IMPORTANT}", value.trim())
                } else {
                    value.to_owned()
                };
                (property, value)
            })
            .collect();

        Rule::new(selector, declarations)
    }

    /// Build one utility rule per preset.
    ///
    /// The preset identifier (slug, or name as a fallback) is reduced to a class safe token and
    /// substituted for `$slug` in `pattern`, `value` computes the value of `property`.
    /// Presets without a usable identifier or value are skipped.
    pub fn utility_rules_from_presets(
        presets: &[Preset],
        pattern: &str,
        property: &str,
        value: impl Fn(&Preset) -> String,
        important: bool,
    ) -> Vec<Rule> {
        presets
            .iter()
            .filter_map(|preset| {
                let Some(identifier) = preset.identifier() else {
                    log::debug!("Skipping preset without slug or name");
                    return None;
                };
                let slug = sanitize_html_class(identifier);
                if slug.is_empty() {
                    log::debug!("Skipping preset with unusable slug {identifier:?}");
                    return None;
                }

                let value = value(preset);
                if value.trim().is_empty() {
                    log::debug!("Skipping preset {slug} with empty value");
                    return None;
                }

                let selector = pattern.replace(SLUG_PLACEHOLDER, &slug);
                Some(Self::utility_rule(selector, [(property, value)], important))
            })
            .collect()
    }

    /// Build rules for `pattern` with `$number` replaced by `1..=count`, all sharing the same
    /// declarations.
    pub fn sequential_container_rules(
        count: usize,
        pattern: &str,
        declarations: &Declarations,
    ) -> Vec<Rule> {
        Self::sequential_container_rules_with(count, pattern, declarations, |_, base| base.clone())
    }

    /// Build rules for `pattern` with `$number` replaced by `1..=count`, `per_index` is given the
    /// index and `declarations` and returns the declarations for that index.
    pub fn sequential_container_rules_with(
        count: usize,
        pattern: &str,
        declarations: &Declarations,
        per_index: impl Fn(usize, &Declarations) -> Declarations,
    ) -> Vec<Rule> {
        (1..=count)
            .map(|index| {
                let selector = pattern.replace(NUMBER_PLACEHOLDER, &index.to_string());
                Rule::new(selector, per_index(index, declarations))
            })
            .collect()
    }

    /// Render a compact `selector{name: value;}` ruleset.
    ///
    /// Returns a empty string if there are no declarations.
    #[must_use]
    pub fn to_ruleset(selector: &str, declarations: &[(&str, &str)]) -> String {
        if declarations.is_empty() {
            return String::new();
        }

        let block: String = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect();
        format!("{selector}{{{block}}}")
    }
}

impl ToCss for StylesheetGenerator {
    fn to_css(&self) -> String {
        self.render(true)
    }
}
