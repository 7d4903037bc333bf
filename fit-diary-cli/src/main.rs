use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod plan;

use commands::{ConfigCommand, LogCommand, UnitsCommand};
use config::Config;
use fit_diary_core::{BatchSubmitter, HttpDiaryApi};

#[derive(Parser)]
#[command(name = "fit-diary")]
#[command(version)]
#[command(about = "Stage diary entries and log them in one batch", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the measurement units available for an item
    Units(UnitsCommand),

    /// Stage the items of a plan file and log them
    Log(LogCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fit_diary=info,fit_diary_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Units(cmd)) => {
            cmd.run(&build_api(&config)).await?;
        }
        Some(Commands::Log(cmd)) => {
            let submitter = BatchSubmitter::new().with_timeout(config.submit_timeout());
            cmd.run(build_api(&config), submitter).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn build_api(config: &Config) -> HttpDiaryApi {
    let api = HttpDiaryApi::new(config.server_url.value.clone());
    match &config.api_token.value {
        Some(token) => api.with_token(token.clone()),
        None => api,
    }
}
