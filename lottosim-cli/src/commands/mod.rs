pub mod buy;
pub mod data;
pub mod history;
pub mod stats;

pub use buy::{handle_buy_command, BuyCommands};
pub use data::{handle_data_command, DataCommands};
pub use history::{handle_history_command, HistoryArgs};
pub use stats::handle_stats_command;
