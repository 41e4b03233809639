//! Inspect and serve the stylesheets and icon sets of a theme

use clap::Parser;

/// Reusable imports
mod prelude {
    pub use anyhow::{Context, Result, anyhow};
    pub use owo_colors::OwoColorize;
}

use prelude::*;

mod options;
mod server;
mod styles;

/// Log level for the given number of `-v` flags
fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let cli = options::Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .init()
        .context("Setting up logging")?;

    let config = cli.config.as_deref();
    match cli.command {
        options::Command::Icons(args) => {
            let config = styles::load_config(config, &args.shared)?;
            styles::print_icons(&config, &args)
        }
        options::Command::Css(args) => {
            let config = styles::load_config(config, &args.shared)?;
            styles::print_css(&config, &args).context("Generating css")
        }
        options::Command::Serve(args) => {
            let config = styles::load_config(config, &args.shared)?;
            server::serve(&config, &args)
        }
    }
}
