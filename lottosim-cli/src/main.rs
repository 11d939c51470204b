mod commands;
mod config;

use clap::{Parser, Subcommand};
use lottosim_core::{LotteryError, LotteryManager};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lottosim")]
#[command(about = "Client-only lottery simulator")]
#[command(version)]
struct Cli {
    /// Data directory for ticket storage
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Buy tickets
    #[command(subcommand)]
    Buy(commands::BuyCommands),

    /// Show purchase statistics
    Stats,

    /// Show ticket history
    History(commands::HistoryArgs),

    /// Export, import, and clear stored data
    #[command(subcommand)]
    Data(commands::DataCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "lottosim_core={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lottosim")
    });

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    // Initialize the manager and load any stored tickets
    let manager = LotteryManager::new(&data_dir).await?;
    manager.load_tickets().await?;

    // Execute command
    let result = match cli.command {
        Commands::Buy(cmd) => commands::handle_buy_command(cmd, &manager).await,
        Commands::Stats => commands::handle_stats_command(&manager),
        Commands::History(args) => commands::handle_history_command(args, &manager),
        Commands::Data(cmd) => commands::handle_data_command(cmd, &manager).await,
    };

    if let Err(e) = result {
        match e {
            LotteryError::InvalidSelection(msg) => {
                eprintln!("Error: Invalid number selection: {}", msg);
                eprintln!("Check the selection and try again");
            }
            LotteryError::BatchAborted { completed, total } => {
                eprintln!("Batch aborted: {} of {} tickets completed", completed, total);
                eprintln!("Completed tickets were kept");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
