use clap::Subcommand;
use dialoguer::Confirm;
use lottosim_core::{LotteryError, LotteryManager, Result};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum DataCommands {
    /// Export all tickets to a JSON file
    Export {
        /// Output path
        #[arg(short, long, default_value = "lottosim-export.json")]
        output: PathBuf,
    },
    /// Import tickets from a JSON export
    Import {
        /// Path to a previously exported file
        input: PathBuf,
    },
    /// Delete all stored tickets
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_data_command(cmd: DataCommands, manager: &LotteryManager) -> Result<()> {
    match cmd {
        DataCommands::Export { output } => {
            let json = manager.export_data().await?;
            tokio::fs::write(&output, json).await?;
            println!("Exported all tickets to {}", output.display());
        }

        DataCommands::Import { input } => {
            let json = tokio::fs::read_to_string(&input).await?;
            manager.import_data(&json).await?;

            let combined = manager.combined_stats();
            println!(
                "Imported {}; now tracking {} tickets",
                input.display(),
                combined.total_tickets
            );
        }

        DataCommands::Clear { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete all stored tickets?")
                    .default(false)
                    .interact()
                    .map_err(|e| LotteryError::internal(format!("Dialog error: {}", e)))?;

                if !confirmed {
                    println!("Aborted");
                    return Ok(());
                }
            }

            manager.clear_all().await?;
            println!("All ticket data cleared");
        }
    }

    Ok(())
}
