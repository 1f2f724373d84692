use clap::Parser;

use skillbars::config::Settings;
use skillbars::logging;

mod cli;

use cli::commands::{demo, init, run};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Falling back to defaults");
        Settings::default()
    });

    logging::init_with_config(&settings.logging);

    match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&settings),
        Commands::Demo { subject, ticks } => demo::run_demo(&settings, subject, ticks).await?,
        Commands::Run { subject, modes } => run::run_session(&settings, subject, modes).await?,
    }

    Ok(())
}
