//! Sticky position offsets generated from the theme spacing scale

use std::sync::Arc;

use pulsar_shared::{cache_keys, handles, hooks};
use serde::Deserialize;

use super::{Preset, RegistryConfig, StylesheetRegistry};
use crate::cache::{StyleCache, cached};
use crate::css::generator::StylesheetGenerator;
use crate::css::sanitize::sanitize_html_class;
use crate::filters::Filters;

/// The admin bar offset every sticky offset is added to
const ADMIN_BAR_OFFSET: &str = "var(--wp-admin--admin-bar--position-offset, 0px)";

/// Pull the spacing presets out of theme settings.
///
/// `spacing.spacingSizes` is either a flat list or a map of origins, the `theme` origin is
/// preferred, then `default`, otherwise every origin is concatenated.
#[must_use]
pub fn resolve_spacing_scale(settings: &serde_json::Value) -> Vec<Preset> {
    let Some(sizes) = settings.pointer("/spacing/spacingSizes") else {
        return Vec::new();
    };

    let lists: Vec<&serde_json::Value> = match sizes {
        serde_json::Value::Array(_) => vec![sizes],
        serde_json::Value::Object(origins) => {
            if let Some(theme) = origins.get("theme").filter(|list| list.is_array()) {
                vec![theme]
            } else if let Some(default) = origins.get("default").filter(|list| list.is_array()) {
                vec![default]
            } else {
                origins.values().filter(|list| list.is_array()).collect()
            }
        }
        _ => Vec::new(),
    };

    lists
        .into_iter()
        .filter_map(serde_json::Value::as_array)
        .flatten()
        .filter_map(|entry| match Preset::deserialize(entry) {
            Ok(preset) => Some(preset),
            Err(err) => {
                log::debug!("Dropping malformed spacing preset: {err}");
                None
            }
        })
        .collect()
}

/// Build the sticky offset utility classes for `scale`.
///
/// Every preset with a usable slug gets `.is-sticky-offset-{slug}`, and `.is-sticky-offset-0` is
/// always emitted for an offset of just the admin bar. Slugs are reduced to class safe
/// characters before they reach the selector or the custom property name.
#[must_use]
pub fn sticky_offset_generator(scale: &[Preset]) -> StylesheetGenerator {
    let mut generator = StylesheetGenerator::new();

    for preset in scale {
        let Some(raw) = preset.slug.as_deref().filter(|slug| !slug.is_empty()) else {
            log::debug!("Skipping spacing preset without slug");
            continue;
        };
        let slug = sanitize_html_class(raw);
        if slug.is_empty() {
            log::debug!("Skipping spacing preset with unusable slug {raw:?}");
            continue;
        }

        generator.add_rule(StylesheetGenerator::utility_rule(
            format!(".is-sticky-offset-{slug}"),
            [(
                "top",
                format!("calc(var(--wp--preset--spacing--{slug}) + {ADMIN_BAR_OFFSET})"),
            )],
            false,
        ));
    }

    generator.add_rule(StylesheetGenerator::utility_rule(
        ".is-sticky-offset-0",
        [("top", format!("calc(0px + {ADMIN_BAR_OFFSET})"))],
        false,
    ));

    generator
}

/// Generate the minified sticky offset stylesheet for `scale`, see [`sticky_offset_generator`].
#[must_use]
pub fn compute_sticky_offset_css(scale: &[Preset]) -> String {
    sticky_offset_generator(scale).render(true)
}

/// Serves the sticky offset stylesheet for a theme
pub struct StickyOffsetRegistry {
    /// The theme settings (`settings` object of `theme.json`)
    settings: serde_json::Value,
    /// Where generated css is cached
    cache: Arc<dyn StyleCache>,
    /// Cache behaviour
    config: RegistryConfig,
    /// Filters applied to the spacing scale
    filters: Filters<Vec<Preset>>,
}

impl StickyOffsetRegistry {
    /// Create a registry for the given theme settings
    #[must_use]
    pub fn new(settings: serde_json::Value, cache: Arc<dyn StyleCache>, config: RegistryConfig) -> Self {
        Self {
            settings,
            cache,
            config,
            filters: Filters::new(hooks::STICKY_OFFSET_SPACING),
        }
    }

    /// The filters applied to the spacing scale
    pub fn filters_mut(&mut self) -> &mut Filters<Vec<Preset>> {
        &mut self.filters
    }

    /// The spacing scale after filters
    #[must_use]
    pub fn spacing_scale(&self) -> Vec<Preset> {
        self.filters.apply(resolve_spacing_scale(&self.settings))
    }
}

impl StylesheetRegistry for StickyOffsetRegistry {
    fn css(&self) -> String {
        cached(
            self.cache.as_ref(),
            cache_keys::STICKY_OFFSET_STYLES,
            self.config.cache_ttl,
            self.config.development,
            || {
                let scale = self.spacing_scale();
                if scale.is_empty() {
                    return String::new();
                }
                compute_sticky_offset_css(&scale)
            },
        )
    }

    fn render(&self, minified: bool) -> String {
        if minified {
            return self.css();
        }

        let scale = self.spacing_scale();
        if scale.is_empty() {
            return String::new();
        }
        sticky_offset_generator(&scale).render(false)
    }

    fn handle(&self) -> &str {
        handles::STICKY_OFFSET_UTILITIES
    }

    fn clear_cache(&self) -> bool {
        self.cache.delete(cache_keys::STICKY_OFFSET_STYLES)
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use serde_json::json;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::css::assert_valid_css;

    fn settings() -> serde_json::Value {
        json!({
            "spacing": {
                "spacingSizes": {
                    "default": [{"slug": "20", "size": "0.5rem"}],
                    "theme": [
                        {"slug": "small", "name": "Small", "size": "1rem"},
                        {"name": "No slug", "size": "2rem"},
                        {"slug": "large", "size": "3rem"}
                    ]
                }
            }
        })
    }

    #[test]
    fn theme_origin_is_preferred() {
        let slugs: Vec<_> = resolve_spacing_scale(&settings())
            .into_iter()
            .map(|preset| preset.identifier().map(str::to_owned))
            .collect();
        assert_eq!(
            slugs,
            [Some("small".into()), Some("No slug".into()), Some("large".into())]
        );
    }

    #[test]
    fn default_then_merged_origins() {
        let default = json!({"spacing": {"spacingSizes": {"default": [{"slug": "20"}], "custom": [{"slug": "x"}]}}});
        assert_eq!(resolve_spacing_scale(&default), [Preset::new("20")]);

        let merged = json!({"spacing": {"spacingSizes": {"a": [{"slug": "1"}], "b": [{"slug": "2"}]}}});
        assert_eq!(resolve_spacing_scale(&merged), [Preset::new("1"), Preset::new("2")]);

        let flat = json!({"spacing": {"spacingSizes": [{"slug": "flat"}]}});
        assert_eq!(resolve_spacing_scale(&flat), [Preset::new("flat")]);

        assert!(resolve_spacing_scale(&json!({})).is_empty());
        assert!(resolve_spacing_scale(&json!({"spacing": {"spacingSizes": 4}})).is_empty());
    }

    #[test]
    fn generates_offsets() {
        let css = compute_sticky_offset_css(&resolve_spacing_scale(&settings()));
        assert_valid_css(&css);
        assert_snapshot!(css, @".is-sticky-offset-small { top: calc(var(--wp--preset--spacing--small) + var(--wp-admin--admin-bar--position-offset, 0px)); }.is-sticky-offset-large { top: calc(var(--wp--preset--spacing--large) + var(--wp-admin--admin-bar--position-offset, 0px)); }.is-sticky-offset-0 { top: calc(0px + var(--wp-admin--admin-bar--position-offset, 0px)); }");
    }

    #[test]
    fn slugs_cannot_break_out_of_the_selector() {
        let css = compute_sticky_offset_css(&[
            Preset::new("x{} body{display:none} .y"),
            Preset::new("{}"),
        ]);
        assert_valid_css(&css);
        assert!(!css.contains("body{"));
        assert!(css.starts_with(
            ".is-sticky-offset-xbodydisplaynoney { top: calc(var(--wp--preset--spacing--xbodydisplaynoney) + "
        ));
        assert_eq!(css.matches(".is-sticky-offset-").count(), 2);
    }

    #[test]
    fn pretty_render_puts_rules_on_lines() {
        let registry = StickyOffsetRegistry::new(
            settings(),
            Arc::new(MemoryCache::new()),
            RegistryConfig::default(),
        );
        let pretty = registry.render(false);
        assert_eq!(pretty.lines().count(), 3);
        assert!(pretty.ends_with("}\n"));
        assert_eq!(pretty.replace('\n', ""), registry.render(true));
    }

    #[test]
    fn empty_scale_gives_no_css() {
        let registry = StickyOffsetRegistry::new(
            json!({}),
            Arc::new(MemoryCache::new()),
            RegistryConfig::default(),
        );
        assert_eq!(registry.css(), "");
        assert!(!registry.clear_cache());
    }

    #[test]
    fn caches_until_cleared() {
        let cache = Arc::new(MemoryCache::new());
        let mut registry =
            StickyOffsetRegistry::new(settings(), cache.clone(), RegistryConfig::default());

        let first = registry.css();
        registry
            .filters_mut()
            .add("only large", |scale: Vec<Preset>| {
                scale
                    .into_iter()
                    .filter(|preset| preset.slug.as_deref() == Some("large"))
                    .collect()
            });
        assert_eq!(registry.css(), first);

        assert!(registry.clear_cache());
        let filtered = registry.css();
        assert!(!filtered.contains("sticky-offset-small"));
        assert!(filtered.contains(".is-sticky-offset-large"));
        assert_eq!(cache.get(cache_keys::STICKY_OFFSET_STYLES), Some(filtered));
    }

    #[test]
    fn development_mode_skips_cache() {
        let cache = Arc::new(MemoryCache::new());
        let registry = StickyOffsetRegistry::new(
            settings(),
            cache.clone(),
            RegistryConfig {
                development: true,
                ..RegistryConfig::default()
            },
        );

        assert!(!registry.css().is_empty());
        assert_eq!(cache.get(cache_keys::STICKY_OFFSET_STYLES), None);
    }
}
