//! Cached access to the icon sets

use std::path::PathBuf;
use std::sync::Arc;

use pulsar_shared::{cache_keys, handles, hooks};

use super::{IconSet, icon_utility_generator, load_icon_sets, normalize_icon_sets};
use crate::cache::{StyleCache, cached};
use crate::filters::Filters;
use crate::registry::{RegistryConfig, StylesheetRegistry};

/// Discovers, normalizes and caches icon sets
pub struct IconRegistry {
    /// Directory holding one folder per icon set
    icons_dir: PathBuf,
    /// Where normalized sets are cached, as json
    cache: Arc<dyn StyleCache>,
    /// Cache behaviour
    config: RegistryConfig,
    /// Filters applied to the discovered sets before normalization
    filters: Filters<Vec<IconSet>>,
}

impl IconRegistry {
    /// Create a registry reading icons from `icons_dir`
    #[must_use]
    pub fn new(icons_dir: impl Into<PathBuf>, cache: Arc<dyn StyleCache>, config: RegistryConfig) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            cache,
            config,
            filters: Filters::new(hooks::ICON_SETS),
        }
    }

    /// The directory icons are read from
    #[must_use]
    pub fn icons_dir(&self) -> &std::path::Path {
        &self.icons_dir
    }

    /// The filters applied to the discovered sets
    pub fn filters_mut(&mut self) -> &mut Filters<Vec<IconSet>> {
        &mut self.filters
    }

    /// Discover, filter and normalize the icon sets, ignoring the cache
    fn compute_icon_sets(&self) -> Vec<IconSet> {
        let discovered = match load_icon_sets(&self.icons_dir) {
            Ok(sets) => sets,
            Err(err) => {
                log::warn!("Failed to load icons: {err}");
                Vec::new()
            }
        };

        normalize_icon_sets(self.filters.apply(discovered))
    }

    /// Every available icon set
    #[must_use]
    pub fn icon_sets(&self) -> Vec<IconSet> {
        let json = cached(
            self.cache.as_ref(),
            cache_keys::ICON_SETS,
            self.config.cache_ttl,
            self.config.development,
            || {
                let sets = self.compute_icon_sets();
                if sets.is_empty() {
                    return String::new();
                }
                serde_json::to_string(&sets).unwrap_or_else(|err| {
                    log::warn!("Failed to serialize icon sets: {err}");
                    String::new()
                })
            },
        );

        if json.is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&json).unwrap_or_else(|err| {
            log::warn!("Discarding corrupt cached icon sets: {err}");
            self.cache.delete(cache_keys::ICON_SETS);
            self.compute_icon_sets()
        })
    }

    /// The `--icon` utility classes for every icon
    #[must_use]
    pub fn utility_css(&self) -> String {
        self.render(true)
    }
}

impl StylesheetRegistry for IconRegistry {
    fn css(&self) -> String {
        self.utility_css()
    }

    fn render(&self, minified: bool) -> String {
        let sets = self.icon_sets();
        if sets.is_empty() {
            return String::new();
        }
        icon_utility_generator(&sets).render(minified)
    }

    fn handle(&self) -> &str {
        handles::ICON_UTILITIES
    }

    fn clear_cache(&self) -> bool {
        self.cache.delete(cache_keys::ICON_SETS)
    }
}
