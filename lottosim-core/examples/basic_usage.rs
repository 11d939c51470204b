use lottosim_core::{Game, LotteryManager};
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create temp dir
    let temp_dir = tempdir()?;
    println!("Using temporary directory: {:?}", temp_dir.path());

    // Initialize manager
    let manager = LotteryManager::new(temp_dir.path()).await?;

    println!("Buying 5 lotto tickets...");
    let tickets = manager.purchase_lotto(None, 5).await?;
    for ticket in &tickets {
        if let Some(result) = &ticket.result {
            println!(
                "  {:?} bonus {:?} -> rank {} prize {}",
                ticket.numbers.main, ticket.numbers.bonus, result.rank, result.prize
            );
        }
    }

    println!("\nBuying 200 scratch tickets in a batch...");
    manager
        .purchase_scratch_batch(200, |completed, total| {
            println!("  progress: {}/{}", completed, total);
        }, None)
        .await?;

    println!("\nBuying a pension ticket...");
    let pension = manager.purchase_pension(None, 1).await?;
    if let Some(result) = &pension[0].result {
        println!(
            "  group {} number {} -> rank {}",
            pension[0].numbers.group, pension[0].numbers.number, result.rank
        );
    }

    println!("\nStats:");
    for game in Game::ALL {
        let stats = manager.stats(game);
        println!(
            "  {}: {} tickets, spent {}, won {}, win rate {:.2}%, ROI {:.2}%",
            game, stats.total_tickets, stats.total_spent, stats.total_won, stats.win_rate, stats.roi
        );
    }

    println!("\nDraw seed fingerprint: {}", manager.seed_fingerprint());
    println!("\nExample completed successfully!");

    Ok(())
}
