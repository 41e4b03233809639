//! Shared constants, names, etc across the pulsar project.

/// The version stamped on registered stylesheet handles.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The REST namespace the icon endpoint lives under.
pub const REST_NAMESPACE: &str = "pulsar-extensions/v1";

/// The icon endpoint route, relative to [`REST_NAMESPACE`].
pub const ICONS_ROUTE: &str = "/icons";

/// Seconds in a day, the default lifetime of cached stylesheets.
pub const DAY_IN_SECONDS: u64 = 86_400;

/// The default prefix for auto numbered container classes.
pub const DEFAULT_CONTAINER_PREFIX: &str = "wp-container";

/// Stylesheet handles used when enqueueing generated css.
pub mod handles {
    /// Handle for the block container styles.
    pub const BLOCK_STYLES: &str = "pulsar-extensions-block-styles";
    /// Handle for the icon utility classes.
    pub const ICON_UTILITIES: &str = "pulsar-extensions-icon-utilities";
    /// Handle for the sticky offset utility classes.
    pub const STICKY_OFFSET_UTILITIES: &str = "pulsar-extensions-sticky-offset-utilities";
}

/// Keys generated values are stored under in the style cache.
pub mod cache_keys {
    /// The normalized icon sets.
    pub const ICON_SETS: &str = "pulsar_extensions_icon_sets";
    /// The sticky offset stylesheet.
    pub const STICKY_OFFSET_STYLES: &str = "pulsar_extensions_sticky_offset_styles";
}

/// Names of the filter hooks third parties can attach to.
pub mod hooks {
    /// Receives the discovered icon sets before normalization.
    pub const ICON_SETS: &str = "pulsar_extensions_icon_sets";
    /// Receives the spacing scale used for sticky offsets.
    pub const STICKY_OFFSET_SPACING: &str = "pulsar_extensions_sticky_offset_spacing";
}

/// The full path of the icon endpoint as served over http.
#[must_use]
pub fn icons_endpoint() -> String {
    format!("/wp-json/{REST_NAMESPACE}{ICONS_ROUTE}")
}
