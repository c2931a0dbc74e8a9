// Keyscope CLI entry point

use clap::Parser;
use keyscope_cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(&cli, &mut stdout).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
