//! flowview CLI entry point

use clap::Parser;
use flowview::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("FLOWVIEW_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore(args) => flowview::cli::explore::run(args),
        Commands::Stats(args) => flowview::cli::stats::run_stats(args),
        Commands::Paths(args) => flowview::cli::stats::run_paths(args),
    }
}
