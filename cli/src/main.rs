
mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{aggregate, merge, summary};
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hdbmap={level},hdbmap_cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Merge(args) => merge::run(&cli, args),
        Commands::MergeTowns(args) => merge::run_towns(&cli, args),
        Commands::Aggregate(args) => aggregate::run(&cli, args),
        Commands::Summary(args) => summary::run(&cli, args),
        #[cfg(feature = "download")]
        Commands::Fetch(args) => commands::fetch::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
