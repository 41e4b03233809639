//! Auto numbered container classes for block instances
//!
//! Blocks whose styles can not be expressed inline are given a unique `wp-container-{n}` class,
//! the rule for it is collected here and flushed to the host once.

use pulsar_shared::DEFAULT_CONTAINER_PREFIX;

use super::{StyleSink, flush_to_sink};
use crate::css::declarations::Declarations;
use crate::css::generator::StylesheetGenerator;
use crate::css::rule::Rule;

/// Mints container classes and collects their rules
#[derive(Default, Debug)]
pub struct BlockStylesRegistry {
    /// The last number handed out
    container_counter: usize,
    /// Rules for every minted class
    generator: StylesheetGenerator,
    /// Have the styles been flushed to the sink
    enqueued: bool,
}

impl BlockStylesRegistry {
    /// Create a empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `declarations` under a new `wp-container-{n}` class, returning the class name.
    pub fn register(&mut self, declarations: impl Into<Declarations>) -> String {
        self.register_with_prefix(declarations, DEFAULT_CONTAINER_PREFIX)
    }

    /// Register `declarations` under a new `{prefix}-{n}` class, returning the class name.
    pub fn register_with_prefix(
        &mut self,
        declarations: impl Into<Declarations>,
        prefix: &str,
    ) -> String {
        self.container_counter = self.container_counter.saturating_add(1);
        let class_name = format!("{prefix}-{}", self.container_counter);

        log::trace!("Registered block style {class_name}");
        self.generator
            .add_rule(Rule::new(format!(".{class_name}"), declarations));

        class_name
    }

    /// Register every declaration set, returning the class names in order.
    pub fn register_many<D: Into<Declarations>>(
        &mut self,
        styles: impl IntoIterator<Item = D>,
        prefix: &str,
    ) -> Vec<String> {
        styles
            .into_iter()
            .map(|declarations| self.register_with_prefix(declarations, prefix))
            .collect()
    }

    /// The css for every registered class
    #[must_use]
    pub fn stylesheet(&self) -> String {
        self.render(true)
    }

    /// The css for every registered class, with every rule on its own line unless `minified`
    #[must_use]
    pub fn render(&self, minified: bool) -> String {
        self.generator.render(minified)
    }

    /// Flush the stylesheet to `sink` under `handle`.
    ///
    /// This only happens once, later calls do nothing until [`Self::clear`].
    /// If there is no css yet nothing is flushed and a later call may still flush.
    pub fn enqueue(&mut self, sink: &mut dyn StyleSink, handle: &str) {
        if self.enqueued {
            return;
        }

        let css = self.stylesheet();
        if css.is_empty() {
            return;
        }

        flush_to_sink(sink, handle, &css);
        self.enqueued = true;
    }

    /// Has the stylesheet been flushed
    #[must_use]
    pub fn is_enqueued(&self) -> bool {
        self.enqueued
    }

    /// Forget every class, reset the counter and allow enqueueing again
    pub fn clear(&mut self) {
        self.container_counter = 0;
        self.generator.clear();
        self.enqueued = false;
    }

    /// The number of classes handed out since the last clear
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.container_counter
    }
}
