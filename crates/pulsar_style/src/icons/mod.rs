//! Icon sets discovered from svg files, and the css utility classes exposing them
//!
//! Every icon becomes a `.has-icon-{set}-{icon}` class setting the `--icon` custom property to
//! the svg as a data uri, which the block styles use as a mask.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::css::generator::StylesheetGenerator;
use crate::css::sanitize::{format_label, sanitize_html_class, sanitize_slug};

mod loader;
mod registry;

pub use loader::load_icon_sets;
pub use registry::IconRegistry;

/// A single icon
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Slug of the icon, unique within its set
    pub name: String,
    /// Human readable name
    #[serde(default)]
    pub label: String,
    /// The svg markup
    pub source: String,
}

/// A named group of icons
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSet {
    /// Slug of the set
    pub name: String,
    /// Human readable name
    #[serde(default)]
    pub label: String,
    /// The icons in the set
    #[serde(default)]
    pub icons: Vec<Icon>,
}

/// Characters left alone by RFC 3986 percent encoding
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Whitespace between tags
static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "Pattern is a constant")]
    Regex::new(r">\s+<").expect("between tags pattern")
});

/// Runs of whitespace
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "Pattern is a constant")]
    Regex::new(r"\s+").expect("whitespace pattern")
});

/// Trim svg markup, returning nothing if it is not svg.
fn prepare_svg_source(source: &str) -> Option<String> {
    let source = source.trim();
    if source.is_empty() || !source.contains("<svg") {
        return None;
    }
    Some(source.to_owned())
}

/// Use `label` if it is not blank, otherwise derive one from `slug`
fn label_or_default(label: &str, slug: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        format_label(slug)
    } else {
        label.to_owned()
    }
}

/// Bring icon sets into a consistent shape.
///
/// Names are slugified, labels filled in, and sets or icons that end up without a name, icons or
/// svg source are dropped.
#[must_use]
pub fn normalize_icon_sets(icon_sets: Vec<IconSet>) -> Vec<IconSet> {
    icon_sets
        .into_iter()
        .filter_map(|set| {
            let name = sanitize_slug(&set.name);
            if name.is_empty() {
                log::debug!("Dropping icon set without a usable name {:?}", set.name);
                return None;
            }

            let icons: Vec<Icon> = set.icons.into_iter().filter_map(normalize_icon).collect();
            if icons.is_empty() {
                log::debug!("Dropping icon set {name} without icons");
                return None;
            }

            Some(IconSet {
                label: label_or_default(&set.label, &name),
                name,
                icons,
            })
        })
        .collect()
}

/// Normalize a single icon, see [`normalize_icon_sets`]
fn normalize_icon(icon: Icon) -> Option<Icon> {
    let name = sanitize_slug(&icon.name);
    let Some(source) = prepare_svg_source(&icon.source) else {
        log::debug!("Dropping icon {name:?} without svg source");
        return None;
    };
    if name.is_empty() {
        log::debug!("Dropping icon without a usable name {:?}", icon.name);
        return None;
    }

    Some(Icon {
        label: label_or_default(&icon.label, &name),
        name,
        source,
    })
}

/// Convert svg markup into a css `url()` holding a data uri.
///
/// ```rust
/// # use pulsar_style::icons::svg_to_data_uri;
/// assert_eq!(
///     svg_to_data_uri("<svg a=\"b\">\n  <path/>\n</svg>"),
///     "url(\"data:image/svg+xml,%3Csvg%20a%3D%27b%27%3E%3Cpath%2F%3E%3C%2Fsvg%3E\")"
/// );
/// ```
#[must_use]
pub fn svg_to_data_uri(svg: &str) -> String {
    let svg = BETWEEN_TAGS.replace_all(svg, "><");
    let svg = WHITESPACE.replace_all(&svg, " ");
    let svg = svg.trim().replace('"', "'");
    let encoded = utf8_percent_encode(&svg, URI_COMPONENT);

    format!("url(\"data:image/svg+xml,{encoded}\")")
}

/// The selector of the utility class for an icon
#[must_use]
pub fn icon_selector(set: &str, icon: &str) -> String {
    format!(
        ".has-icon-{}-{}",
        sanitize_html_class(set),
        sanitize_html_class(icon)
    )
}

/// Build the `--icon` utility classes for every icon.
#[must_use]
pub fn icon_utility_generator(icon_sets: &[IconSet]) -> StylesheetGenerator {
    let mut generator = StylesheetGenerator::new();
    for set in icon_sets {
        for icon in &set.icons {
            generator.add_rule(StylesheetGenerator::utility_rule(
                icon_selector(&set.name, &icon.name),
                [("--icon", svg_to_data_uri(&icon.source))],
                false,
            ));
        }
    }
    generator
}

/// Generate the minified `--icon` utility classes for every icon.
#[must_use]
pub fn compute_icon_utility_css(icon_sets: &[IconSet]) -> String {
    icon_utility_generator(icon_sets).render(true)
}
