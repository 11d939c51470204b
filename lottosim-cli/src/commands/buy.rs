use clap::Subcommand;
use lottosim_core::{LotteryError, LotteryManager, LottoNumbers, PensionNumbers, Result};

#[derive(Subcommand)]
pub enum BuyCommands {
    /// Buy lotto 6/45 tickets
    Lotto {
        /// Number of tickets
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Manual selection: six comma-separated numbers with an optional
        /// bonus, e.g. "3,11,17,25,33,41+7"
        #[arg(short, long)]
        numbers: Option<String>,
    },
    /// Buy scratch tickets
    Scratch {
        /// Number of tickets
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Buy pension tickets
    Pension {
        /// Number of tickets
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Manual group digit 1-5
        #[arg(short, long, requires = "number")]
        group: Option<String>,
        /// Manual six-digit number
        #[arg(short, long, requires = "group")]
        number: Option<String>,
    },
}

pub async fn handle_buy_command(cmd: BuyCommands, manager: &LotteryManager) -> Result<()> {
    match cmd {
        BuyCommands::Lotto { count, numbers } => {
            let manual = numbers.as_deref().map(parse_lotto_numbers).transpose()?;
            let tickets = manager
                .purchase_lotto_batch(manual.as_ref(), count, print_progress, None)
                .await?;

            if tickets.len() <= 10 {
                for ticket in &tickets {
                    if let Some(result) = &ticket.result {
                        println!(
                            "  {} + {}  ->  rank {} ({} won)",
                            format_numbers(&ticket.numbers.main),
                            ticket.numbers.bonus.map_or("-".to_string(), |b| b.to_string()),
                            result.rank,
                            result.prize
                        );
                    }
                }
            }

            print_summary(
                "lotto",
                tickets.len(),
                tickets.iter().filter(|t| t.is_winner()).count(),
                tickets.iter().map(|t| t.prize_value()).sum(),
            );
        }

        BuyCommands::Scratch { count } => {
            let tickets = manager
                .purchase_scratch_batch(count, print_progress, None)
                .await?;

            if tickets.len() <= 10 {
                for ticket in &tickets {
                    if let Some(result) = &ticket.result {
                        println!(
                            "  {} | lucky {}  ->  {} won",
                            format_numbers(&ticket.user_numbers()),
                            format_numbers(&ticket.lucky_numbers),
                            result.prize
                        );
                    }
                }
            }

            print_summary(
                "scratch",
                tickets.len(),
                tickets.iter().filter(|t| t.is_winner()).count(),
                tickets.iter().map(|t| t.prize_value()).sum(),
            );
        }

        BuyCommands::Pension { count, group, number } => {
            let manual = match (group, number) {
                (Some(group), Some(number)) => Some(PensionNumbers { group, number }),
                _ => None,
            };
            let tickets = manager
                .purchase_pension_batch(manual.as_ref(), count, print_progress, None)
                .await?;

            if tickets.len() <= 10 {
                for ticket in &tickets {
                    if let Some(result) = &ticket.result {
                        println!(
                            "  group {} no. {}  ->  rank {} ({} won)",
                            ticket.numbers.group,
                            ticket.numbers.number,
                            result.rank,
                            result.total_prize
                        );
                    }
                }
            }

            print_summary(
                "pension",
                tickets.len(),
                tickets.iter().filter(|t| t.is_winner()).count(),
                tickets.iter().map(|t| t.prize_value()).sum(),
            );
        }
    }

    Ok(())
}

fn print_progress(completed: usize, total: usize) {
    if total > 50 {
        println!("  generated {}/{}", completed, total);
    }
}

fn print_summary(game: &str, count: usize, winners: usize, won: u64) {
    println!(
        "Bought {} {} ticket(s): {} winner(s), {} won",
        count, game, winners, won
    );
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_lotto_numbers(input: &str) -> Result<LottoNumbers> {
    let (main_part, bonus_part) = match input.split_once('+') {
        Some((main, bonus)) => (main, Some(bonus)),
        None => (input, None),
    };

    let main = main_part
        .split(',')
        .map(|n| n.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|e| LotteryError::invalid_selection(format!("bad number list: {}", e)))?;

    let bonus = bonus_part
        .map(|b| b.trim().parse::<u8>())
        .transpose()
        .map_err(|e| LotteryError::invalid_selection(format!("bad bonus number: {}", e)))?;

    Ok(LottoNumbers { main, bonus })
}
