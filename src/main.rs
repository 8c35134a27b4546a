//! Horizon CLI: compile provisioning definitions into executable jobs.

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "horizon",
    version,
    about = "Compile provisioning definitions into ordered jobs and multilingual translation tables"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: horizon::cli::Commands,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output.
    let fallback = match cli.verbose {
        0 => "horizon=warn",
        1 => "horizon=info",
        _ => "horizon=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = horizon::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
