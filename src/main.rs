use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tabsteer::{replay, EventTrace, Settings};

#[derive(Parser)]
#[command(name = "tabsteer", version, about = "Tab placement and close-focus controller")]
struct Cli {
    /// Settings file (defaults to ~/.tabsteer/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded host-event trace and print the commands issued.
    Replay {
        /// JSONL trace file.
        trace: PathBuf,

        /// Print commands as JSON lines instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Load the settings file and print the resolved configuration.
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    match cli.command {
        Command::Replay { trace, json } => {
            let trace = EventTrace::load(&trace)?;
            let report = replay::replay(&trace, settings).await;

            for command in &report.commands {
                if json {
                    println!("{}", serde_json::to_string(command)?);
                } else {
                    println!("{command}");
                }
            }
            eprintln!(
                "replayed {} events, issued {} commands",
                report.events,
                report.commands.len()
            );
        }
        Command::CheckConfig => {
            println!("{settings:#?}");
        }
    }

    Ok(())
}
