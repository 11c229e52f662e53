#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod utils;

// Re-export commonly used types outside of crate
pub use config::{BotConfig, PERSISTENCE, SCHEDULE};
pub use engine::{PassOutcome, ScanCoordinator, ScanReport, SignalEngine};
pub use error::SignalError;

// CLI argument parsing
use {
    clap::{Parser, Subcommand},
    std::path::PathBuf,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding config.json and trade_history.json
    #[arg(long, default_value = PERSISTENCE.default_data_dir)]
    pub data_dir: PathBuf,

    /// Seconds between scheduled scans
    #[arg(long, default_value_t = SCHEDULE.scan_interval.as_secs())]
    pub interval_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scan on a timer until Ctrl-C (default)
    Run,
    /// Run one pass and print the report
    ScanOnce,
    /// Send the test message to active channels
    TestNotify,
    /// Record and announce a synthetic Long on BTC/USDT
    FakeSignal,
    /// Price BTC/USDT on futures and spot
    Connectivity,
    /// Live tickers for the configured symbols
    Prices,
    /// Apply a JSON settings patch, e.g. '{"max_open_trades": 3}'
    Settings { patch: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_timer_mode() {
        let cli = Cli::parse_from(["signal-sniper"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.interval_secs, 300);
        assert_eq!(cli.data_dir, PathBuf::from("."));
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["signal-sniper", "--data-dir", "/tmp/x", "scan-once"]);
        assert_eq!(cli.command, Some(Command::ScanOnce));
        let cli = Cli::parse_from(["signal-sniper", "settings", "{\"rsi_period\": 10}"]);
        assert_eq!(
            cli.command,
            Some(Command::Settings {
                patch: Some("{\"rsi_period\": 10}".to_string())
            })
        );
    }
}
