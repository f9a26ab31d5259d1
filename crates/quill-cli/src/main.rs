use anyhow::Result;
use clap::{Parser, Subcommand};
use quill_core::session::TransformKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod context;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - streamed academic rewriting and outlining", long_about = None)]
struct Cli {
    /// Keep entries in memory instead of the remote store
    #[arg(long, global = true)]
    offline: bool,

    /// Directory holding config.toml and secret.json
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a text and stream the result
    Submit {
        /// expand | outline
        #[arg(long, short, default_value = "expand")]
        kind: TransformKind,
        /// Text to transform; "-" reads standard input
        text: String,
    },
    /// Show the most recent entries
    History {
        #[arg(long, short)]
        kind: Option<TransformKind>,
    },
    /// Re-open a stored entry
    Show {
        id: i64,
        /// Print the output at once instead of revealing it
        #[arg(long)]
        instant: bool,
    },
    /// Delete a stored entry
    Delete { id: i64 },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = context::Options {
        offline: cli.offline,
        config_dir: cli.config_dir,
    };

    match cli.command {
        Commands::Submit { kind, text } => commands::submit::run(&options, kind, text).await?,
        Commands::History { kind } => commands::history::run(&options, kind).await?,
        Commands::Show { id, instant } => commands::show::run(&options, id, instant).await?,
        Commands::Delete { id } => commands::delete::run(&options, id).await?,
    }

    Ok(())
}
