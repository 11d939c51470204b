use comfy_table::{presets::UTF8_FULL, Table};
use lottosim_core::{Game, LotteryManager, PurchaseStats, Result};

pub fn handle_stats_command(manager: &LotteryManager) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Game", "Tickets", "Spent", "Won", "Wins", "Win rate", "ROI",
    ]);

    for game in Game::ALL {
        add_row(&mut table, game.as_str(), &manager.stats(game));
    }
    add_row(&mut table, "combined", &manager.combined_stats());

    println!("{}", table);
    Ok(())
}

fn add_row(table: &mut Table, label: &str, stats: &PurchaseStats) {
    table.add_row(vec![
        label.to_string(),
        stats.total_tickets.to_string(),
        stats.total_spent.to_string(),
        stats.total_won.to_string(),
        stats.win_count.to_string(),
        format!("{:.2}%", stats.win_rate),
        format!("{:+.2}%", stats.roi),
    ]);
}
