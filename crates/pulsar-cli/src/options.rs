//! Define cli and config options

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use pulsar_style::registry::RegistryConfig;
use serde::Deserialize;

use crate::prelude::*;

/// Config file looked for in the working directory
const DEFAULT_CONFIG: &str = "pulsar.toml";

/// The toml config
#[derive(Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub(crate) struct PulsarConfig {
    /// Directory holding one folder per icon set
    pub(crate) icons_dir: PathBuf,
    /// The theme.json to read presets from
    pub(crate) theme_json: Option<PathBuf>,
    /// Always regenerate instead of caching
    pub(crate) development: bool,
    /// How long generated css is cached
    pub(crate) cache_ttl_secs: u64,
    /// Prefix for generated container classes
    pub(crate) block_style_prefix: Box<str>,
    /// Bearer token required by the icon endpoint
    pub(crate) api_token: Option<Box<str>>,
}

impl Default for PulsarConfig {
    fn default() -> Self {
        Self {
            icons_dir: PathBuf::from("assets/icons"),
            theme_json: None,
            development: false,
            cache_ttl_secs: pulsar_shared::DAY_IN_SECONDS,
            block_style_prefix: Box::from(pulsar_shared::DEFAULT_CONTAINER_PREFIX),
            api_token: None,
        }
    }
}

impl PulsarConfig {
    /// Read the config from `path`, or `pulsar.toml` if it exists
    pub(crate) fn read_config(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG);
                if !path.exists() {
                    log::debug!("No {DEFAULT_CONFIG} found, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Parsing config {}", path.display()))
    }

    /// Parse a toml config
    pub(crate) fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the shared arguments
    pub(crate) fn apply(&mut self, args: &SharedArguments) {
        if let Some(icons_dir) = &args.icons_dir {
            self.icons_dir.clone_from(icons_dir);
        }
        if let Some(theme_json) = &args.theme_json {
            self.theme_json = Some(theme_json.clone());
        }
        if args.development {
            self.development = true;
        }
    }

    /// The config used by the caching registries
    pub(crate) fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            development: self.development,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }
}

/// Pulsar CLI
#[derive(Parser)]
#[clap(version, about, author)]
pub(crate) struct Cli {
    /// Config file to use instead of `pulsar.toml`
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,
    /// Increase log output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
    /// The command to run
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Subcommands
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the discovered icon sets as json
    Icons(IconsArguments),
    /// Print the generated stylesheets
    Css(CssArguments),
    /// Serve the icon endpoint and stylesheets over http
    Serve(ServeArguments),
}

/// Arguments for the icons subcommand
#[derive(Parser)]
pub(crate) struct IconsArguments {
    /// Pretty print the json
    #[arg(long)]
    pub(crate) pretty: bool,
    /// The shared arguments
    #[command(flatten)]
    pub(crate) shared: SharedArguments,
}

/// Arguments for the css subcommand
#[derive(Parser)]
pub(crate) struct CssArguments {
    /// Put every rule on its own line
    #[arg(long)]
    pub(crate) pretty: bool,
    /// Output the `<style>` tags that would be enqueued
    #[arg(long)]
    pub(crate) html: bool,
    /// Json file with a list of declaration maps to register as container classes
    #[arg(long)]
    pub(crate) blocks: Option<PathBuf>,
    /// The shared arguments
    #[command(flatten)]
    pub(crate) shared: SharedArguments,
}

/// Arguments for the serve subcommand
#[derive(Parser)]
pub(crate) struct ServeArguments {
    /// Port to use for the server
    #[arg(short, long)]
    pub(crate) port: Option<u16>,
    /// Listen on every interface instead of localhost
    #[arg(long)]
    pub(crate) allow_external: bool,
    /// The shared arguments
    #[command(flatten)]
    pub(crate) shared: SharedArguments,
}

/// Overrides shared by every subcommand
#[derive(Parser)]
pub(crate) struct SharedArguments {
    /// Directory holding one folder per icon set
    #[arg(long)]
    pub(crate) icons_dir: Option<PathBuf>,
    /// The theme.json to read presets from
    #[arg(long)]
    pub(crate) theme_json: Option<PathBuf>,
    /// Always regenerate instead of caching
    #[arg(long)]
    pub(crate) development: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() -> Result<()> {
        let config = PulsarConfig::parse("")?;
        assert_eq!(config.icons_dir, PathBuf::from("assets/icons"));
        assert_eq!(config.cache_ttl_secs, 86_400);
        assert_eq!(&*config.block_style_prefix, "wp-container");
        assert!(config.api_token.is_none());
        Ok(())
    }

    #[test]
    fn parses_fields() -> Result<()> {
        let config = PulsarConfig::parse(
            r#"
            icons_dir = "icons"
            theme_json = "theme.json"
            development = true
            cache_ttl_secs = 60
            api_token = "secret"
            "#,
        )?;
        assert_eq!(config.theme_json, Some(PathBuf::from("theme.json")));
        let registry = config.registry_config();
        assert!(registry.development);
        assert_eq!(registry.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PulsarConfig::parse("nope = 1").is_err());
    }

    #[test]
    fn arguments_override() -> Result<()> {
        let mut config = PulsarConfig::parse("icons_dir = \"a\"")?;
        config.apply(&SharedArguments {
            icons_dir: Some(PathBuf::from("b")),
            theme_json: None,
            development: true,
        });
        assert_eq!(config.icons_dir, PathBuf::from("b"));
        assert!(config.development);
        Ok(())
    }

    #[test]
    fn cli_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
