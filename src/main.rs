mod aggregator;
mod cache;
mod classifier;
mod cli;
mod error;
mod fmt;
mod loader;
mod models;
mod rules;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { source, ttl } => cli::init::run(&source, ttl),
        Commands::Summary { source, refresh } => cli::summary::run(source, refresh),
        Commands::OwnResources {
            band,
            detail,
            source,
            refresh,
        } => cli::own_resources::run(band, detail, source, refresh),
        #[cfg(feature = "xls")]
        Commands::Projection {
            wages,
            contributions,
        } => cli::projection::run(&wages, &contributions),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
