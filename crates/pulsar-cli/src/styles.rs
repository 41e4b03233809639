//! Assemble the registries from config and print their output

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pulsar_shared::handles;
use pulsar_style::prelude::*;
use pulsar_style::registry::enqueue_registry;

use crate::options::{self, PulsarConfig};
use crate::prelude::*;

/// Declaration maps read from a `--blocks` file, kept in file order
type DeclarationList = Vec<serde_json::Map<String, serde_json::Value>>;

/// Every registry the cli serves
pub(crate) struct Pipeline {
    /// The shared cache
    pub(crate) cache: Arc<dyn StyleCache>,
    /// Icon sets and their utility classes
    pub(crate) icons: IconRegistry,
    /// Sticky offset utility classes
    pub(crate) sticky_offsets: StickyOffsetRegistry,
}

/// Read the `settings` object of a theme.json
fn read_theme_settings(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut theme: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Parsing {}", path.display()))?;

    Ok(match theme.get_mut("settings") {
        Some(settings) => settings.take(),
        None => theme,
    })
}

impl Pipeline {
    /// Build the registries from config
    pub(crate) fn new(config: &PulsarConfig) -> Result<Self> {
        let settings = match &config.theme_json {
            Some(path) => read_theme_settings(path)?,
            None => serde_json::Value::Null,
        };

        let cache: Arc<dyn StyleCache> = Arc::new(MemoryCache::new());
        let registry_config = config.registry_config();

        Ok(Self {
            icons: IconRegistry::new(&config.icons_dir, Arc::clone(&cache), registry_config),
            sticky_offsets: StickyOffsetRegistry::new(settings, Arc::clone(&cache), registry_config),
            cache,
        })
    }

    /// The registries in enqueue order
    pub(crate) fn registries(&self) -> [&dyn StylesheetRegistry; 2] {
        [&self.icons, &self.sticky_offsets]
    }

    /// Every stylesheet joined together
    pub(crate) fn combined_css(&self) -> String {
        join_sheets(self.registries().iter().map(|registry| registry.css()), true)
    }
}

/// Join stylesheets, separating minified sheets with a newline.
///
/// Pretty sheets already end every rule with a newline.
fn join_sheets(sheets: impl IntoIterator<Item = String>, minified: bool) -> String {
    let sheets: Vec<_> = sheets.into_iter().filter(|css| !css.is_empty()).collect();
    if minified {
        sheets.join("\n")
    } else {
        sheets.concat()
    }
}

/// Load the config and apply the cli overrides
pub(crate) fn load_config(path: Option<&Path>, shared: &options::SharedArguments) -> Result<PulsarConfig> {
    let mut config = PulsarConfig::read_config(path)?;
    config.apply(shared);
    Ok(config)
}

/// Print the icon sets as json
pub(crate) fn print_icons(config: &PulsarConfig, args: &options::IconsArguments) -> Result<()> {
    if !config.icons_dir.is_dir() {
        return Err(anyhow!(
            "Icon directory {} not found",
            config.icons_dir.display()
        ));
    }

    let pipeline = Pipeline::new(config)?;
    let sets = pipeline.icons.icon_sets();
    let json = if args.pretty {
        serde_json::to_string_pretty(&sets)?
    } else {
        serde_json::to_string(&sets)?
    };
    println!("{json}");

    let icons: usize = sets.iter().map(|set| set.icons.len()).sum();
    eprintln!(
        "🎨 {} {} {}",
        "Found".bright_blue(),
        icons.to_string().cyan(),
        "icons".bright_blue()
    );
    Ok(())
}

/// Register the container classes listed in a blocks file
fn register_blocks(path: &Path, prefix: &str) -> Result<BlockStylesRegistry> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let styles: DeclarationList =
        serde_json::from_str(&content).with_context(|| format!("Parsing {}", path.display()))?;

    let mut registry = BlockStylesRegistry::new();
    for style in styles {
        let declarations: Declarations = style
            .iter()
            .filter_map(|(property, value)| match value {
                serde_json::Value::String(value) => Some((property.clone(), value.clone())),
                serde_json::Value::Number(value) => Some((property.clone(), value.to_string())),
                _ => None,
            })
            .collect();
        let class = registry.register_with_prefix(declarations, prefix);
        eprintln!("📦 {} {}", "Registered".bright_blue(), class.cyan());
    }
    Ok(registry)
}

/// Print the generated css
pub(crate) fn print_css(config: &PulsarConfig, args: &options::CssArguments) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let mut blocks = args
        .blocks
        .as_deref()
        .map(|path| register_blocks(path, &config.block_style_prefix))
        .transpose()?;

    if args.html {
        let mut sink = InlineStyles::new();
        for registry in pipeline.registries() {
            enqueue_registry(registry, &mut sink);
        }
        if let Some(blocks) = &mut blocks {
            blocks.enqueue(&mut sink, handles::BLOCK_STYLES);
        }
        print!("{}", sink.to_html());
        return Ok(());
    }

    let css = render_css(&pipeline, blocks.as_ref(), !args.pretty);
    if args.pretty {
        print!("{css}");
    } else {
        println!("{css}");
    }
    Ok(())
}

/// Render every stylesheet, followed by the block container classes
fn render_css(pipeline: &Pipeline, blocks: Option<&BlockStylesRegistry>, minified: bool) -> String {
    let registries = pipeline
        .registries()
        .into_iter()
        .map(|registry| registry.render(minified));
    let blocks = blocks.map(|blocks| blocks.render(minified));
    join_sheets(registries.chain(blocks), minified)
}
