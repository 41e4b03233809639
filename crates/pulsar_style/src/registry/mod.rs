//! Registries turn theme data into stylesheets and hand them to the host style system

use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

pub use crate::css::preset::Preset;

pub mod block_styles;
pub mod sticky_offset;

/// Settings shared by the caching registries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Development mode always regenerates, bypassing the cache
    pub development: bool,
    /// How long generated values are cached
    #[serde(with = "seconds")]
    pub cache_ttl: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            development: false,
            cache_ttl: Duration::from_secs(pulsar_shared::DAY_IN_SECONDS),
        }
    }
}

/// Deserialize a duration from whole seconds
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    /// Read a number of seconds
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// A source of a generated stylesheet
pub trait StylesheetRegistry {
    /// The generated css, empty if there is nothing to emit
    fn css(&self) -> String;
    /// The generated css, with every rule on its own line unless `minified`
    fn render(&self, minified: bool) -> String;
    /// The handle the stylesheet is enqueued under
    fn handle(&self) -> &str;
    /// Drop any cached css, returning whether something was cached
    fn clear_cache(&self) -> bool;
}

/// The host style system generated css is flushed to
pub trait StyleSink {
    /// Has `handle` been registered
    fn is_registered(&self, handle: &str) -> bool;
    /// Register a stylesheet handle without a source file
    fn register(&mut self, handle: &str, version: &str);
    /// Mark `handle` for output
    fn enqueue(&mut self, handle: &str);
    /// Attach inline css to `handle`
    fn add_inline(&mut self, handle: &str, css: &str);
}

/// Register `handle` if needed, enqueue it and attach `css`.
pub(crate) fn flush_to_sink(sink: &mut dyn StyleSink, handle: &str, css: &str) {
    if !sink.is_registered(handle) {
        sink.register(handle, pulsar_shared::VERSION);
    }
    sink.enqueue(handle);
    sink.add_inline(handle, css);
}

/// Enqueue the css of `registry`, returning whether anything was enqueued
pub fn enqueue_registry(registry: &dyn StylesheetRegistry, sink: &mut dyn StyleSink) -> bool {
    let css = registry.css();
    if css.is_empty() {
        log::debug!("Nothing to enqueue for {}", registry.handle());
        return false;
    }

    flush_to_sink(sink, registry.handle(), &css);
    true
}

/// A inline stylesheet collected by [`InlineStyles`]
#[derive(Default, Clone, Debug, PartialEq, Eq)]
struct InlineSheet {
    /// The registered version
    version: String,
    /// Has it been enqueued
    enqueued: bool,
    /// Inline css chunks in the order they were added
    css: Vec<String>,
}

/// A in memory [`StyleSink`] that renders enqueued sheets as `<style>` tags.
#[derive(Default, Clone, Debug)]
#[must_use]
pub struct InlineStyles {
    /// Sheets by handle, in registration order
    sheets: IndexMap<String, InlineSheet>,
}

impl InlineStyles {
    /// Create a empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The combined inline css of a enqueued handle
    #[must_use]
    pub fn css(&self, handle: &str) -> Option<String> {
        self.sheets
            .get(handle)
            .filter(|sheet| sheet.enqueued)
            .map(|sheet| sheet.css.join("\n"))
    }

    /// The version a handle was registered with
    #[must_use]
    pub fn version(&self, handle: &str) -> Option<&str> {
        self.sheets.get(handle).map(|sheet| sheet.version.as_str())
    }

    /// Render every enqueued sheet as a `<style>` tag
    #[must_use]
    pub fn to_html(&self) -> String {
        self.sheets
            .iter()
            .filter(|(_, sheet)| sheet.enqueued && !sheet.css.is_empty())
            .map(|(handle, sheet)| {
                format!(
                    "<style id=\"{}-inline-css\">\n{}\n</style>\n",
                    html_escape::encode_double_quoted_attribute(handle),
                    sheet.css.join("\n")
                )
            })
            .collect()
    }
}

impl StyleSink for InlineStyles {
    fn is_registered(&self, handle: &str) -> bool {
        self.sheets.contains_key(handle)
    }

    fn register(&mut self, handle: &str, version: &str) {
        self.sheets.entry(handle.to_owned()).or_default().version = version.to_owned();
    }

    fn enqueue(&mut self, handle: &str) {
        match self.sheets.get_mut(handle) {
            Some(sheet) => sheet.enqueued = true,
            None => log::warn!("Enqueueing unregistered style {handle}"),
        }
    }

    fn add_inline(&mut self, handle: &str, css: &str) {
        match self.sheets.get_mut(handle) {
            Some(sheet) => sheet.css.push(css.to_owned()),
            None => log::warn!("Adding inline css to unregistered style {handle}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A registry returning fixed css
    struct Fixed(&'static str);

    impl StylesheetRegistry for Fixed {
        fn css(&self) -> String {
            self.0.to_owned()
        }
        fn render(&self, _minified: bool) -> String {
            self.css()
        }
        fn handle(&self) -> &str {
            "fixed"
        }
        fn clear_cache(&self) -> bool {
            false
        }
    }

    #[test]
    fn enqueue_writes_style_tag() {
        let mut sink = InlineStyles::new();
        assert!(enqueue_registry(&Fixed(".a { top: 0; }"), &mut sink));

        assert_eq!(sink.css("fixed").as_deref(), Some(".a { top: 0; }"));
        assert_eq!(sink.version("fixed"), Some(pulsar_shared::VERSION));
        assert_eq!(
            sink.to_html(),
            "<style id=\"fixed-inline-css\">\n.a { top: 0; }\n</style>\n"
        );
    }

    #[test]
    fn empty_css_is_not_enqueued() {
        let mut sink = InlineStyles::new();
        assert!(!enqueue_registry(&Fixed(""), &mut sink));
        assert!(!sink.is_registered("fixed"));
        assert_eq!(sink.to_html(), "");
    }

    #[test]
    fn unregistered_handles_are_ignored() {
        let mut sink = InlineStyles::new();
        sink.enqueue("ghost");
        sink.add_inline("ghost", ".a { top: 0; }");
        assert_eq!(sink.css("ghost"), None);
    }

    #[test]
    fn config_from_json() -> serde_json::Result<()> {
        let config: RegistryConfig = serde_json::from_str(r#"{"cache_ttl": 60}"#)?;
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert!(!config.development);
        Ok(())
    }
}
