//! Configuration module for the signal scanner.

// Can all be private now because we have a public re-export.
mod binance;
mod bot;
mod credentials;
mod debug;
mod persistence;

// Public
pub mod constants;

// Re-export commonly used items
pub use binance::{BINANCE, BinanceConfig, REFERENCE_SYMBOL};
pub use bot::{BotConfig, ChannelConfig};
pub use constants::{MAX_TELEGRAM_ACCOUNTS, MIN_ALIGNED_TIMEFRAMES, SCHEDULE};
pub use credentials::{TelegramAccount, load_telegram_accounts};
pub use debug::DF;
pub use persistence::PERSISTENCE;
