use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

fn main() {
    let cli = cli::Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::run_command(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
