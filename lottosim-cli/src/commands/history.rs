use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use lottosim_core::{Game, LotteryError, LotteryManager, Result};

#[derive(Args)]
pub struct HistoryArgs {
    /// Restrict to one game: lotto645, speetto1000, or pension720
    #[arg(short, long)]
    pub game: Option<String>,

    /// Maximum tickets to list per game
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

pub fn handle_history_command(args: HistoryArgs, manager: &LotteryManager) -> Result<()> {
    let games: Vec<Game> = match args.game.as_deref() {
        None => Game::ALL.to_vec(),
        Some(name) => vec![parse_game(name)?],
    };

    for game in games {
        match game {
            Game::Lotto645 => print_lotto(manager, args.limit),
            Game::Speetto1000 => print_scratch(manager, args.limit),
            Game::Pension720 => print_pension(manager, args.limit),
        }
    }

    Ok(())
}

fn parse_game(name: &str) -> Result<Game> {
    match name {
        "lotto645" | "lotto" => Ok(Game::Lotto645),
        "speetto1000" | "scratch" => Ok(Game::Speetto1000),
        "pension720" | "pension" => Ok(Game::Pension720),
        other => Err(LotteryError::invalid_selection(format!(
            "unknown game {:?}, expected lotto645, speetto1000 or pension720",
            other
        ))),
    }
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn print_lotto(manager: &LotteryManager, limit: usize) {
    let tickets = manager.lotto_tickets();
    println!("lotto645 ({} tickets):", tickets.len());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Purchased", "Numbers", "Mode", "Rank", "Prize"]);

    for ticket in tickets.iter().take(limit) {
        let (rank, prize) = ticket
            .result
            .as_ref()
            .map_or((0, 0), |r| (r.rank, r.prize));
        table.add_row(vec![
            ticket.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
            format!(
                "{} + {}",
                format_numbers(&ticket.numbers.main),
                ticket.numbers.bonus.map_or("-".to_string(), |b| b.to_string())
            ),
            if ticket.is_auto { "auto" } else { "manual" }.to_string(),
            rank.to_string(),
            prize.to_string(),
        ]);
    }

    println!("{}", table);
}

fn print_scratch(manager: &LotteryManager, limit: usize) {
    let tickets = manager.scratch_tickets();
    println!("speetto1000 ({} tickets):", tickets.len());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Purchased", "Numbers", "Lucky", "Prize"]);

    for ticket in tickets.iter().take(limit) {
        table.add_row(vec![
            ticket.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
            format_numbers(&ticket.user_numbers()),
            format_numbers(&ticket.lucky_numbers),
            ticket.prize_value().to_string(),
        ]);
    }

    println!("{}", table);
}

fn print_pension(manager: &LotteryManager, limit: usize) {
    let tickets = manager.pension_tickets();
    println!("pension720 ({} tickets):", tickets.len());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Purchased", "Group", "Number", "Mode", "Rank", "Prize"]);

    for ticket in tickets.iter().take(limit) {
        let (rank, prize) = ticket
            .result
            .as_ref()
            .map_or((0, 0), |r| (r.rank, r.total_prize));
        table.add_row(vec![
            ticket.purchase_date.format("%Y-%m-%d %H:%M").to_string(),
            ticket.numbers.group.clone(),
            ticket.numbers.number.clone(),
            if ticket.is_auto { "auto" } else { "manual" }.to_string(),
            rank.to_string(),
            prize.to_string(),
        ]);
    }

    println!("{}", table);
}
