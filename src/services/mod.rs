pub mod telegram;

pub use telegram::{run_bot, TelegramBot};
