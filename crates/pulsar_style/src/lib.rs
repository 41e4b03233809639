#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![forbid(unsafe_code)]

pub mod cache;
pub mod css;
mod error;
mod error_handling;
pub mod filters;
pub mod icons;
pub mod link;
pub mod registry;

pub use error::{Error, Result};

/// Commonly used types and traits.
pub mod prelude {
    pub use super::cache::{MemoryCache, StyleCache};
    pub use super::css::ToCss;
    pub use super::css::declarations::Declarations;
    pub use super::css::generator::StylesheetGenerator;
    pub use super::css::rule::Rule;
    pub use super::filters::Filters;
    pub use super::icons::{Icon, IconRegistry, IconSet};
    pub use super::registry::block_styles::BlockStylesRegistry;
    pub use super::registry::sticky_offset::StickyOffsetRegistry;
    pub use super::registry::{
        InlineStyles,
        Preset,
        RegistryConfig,
        StyleSink,
        StylesheetRegistry,
    };
}
