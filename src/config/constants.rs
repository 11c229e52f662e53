use std::time::Duration;

pub struct ScheduleConfig {
    pub scan_interval: Duration,
}

pub const SCHEDULE: ScheduleConfig = ScheduleConfig {
    scan_interval: Duration::from_secs(5 * 60),
};

/// Highest account index probed for `TELEGRAM_TOKEN_<i>` / `TELEGRAM_CHAT_ID_<i>`.
pub const MAX_TELEGRAM_ACCOUNTS: u32 = 4;

pub mod messages {
    pub const TEST_MESSAGE: &str = "✅ Admin Panel Test: Your Telegram connection is working!";
    pub const SYNTHETIC_SIGNAL: &str = "🧪 FAKE SIGNAL: See history for details.";
}

pub mod synthetic {
    /// Fallback price range when the reference ticker cannot be fetched.
    pub const FALLBACK_PRICE_MIN: f64 = 60_000.0;
    pub const FALLBACK_PRICE_MAX: f64 = 70_000.0;
    /// ATR estimate as a fraction of price.
    pub const ATR_FRACTION: f64 = 0.01;
}

/// Alignment votes a direction needs before the entry rules are consulted.
pub const MIN_ALIGNED_TIMEFRAMES: usize = 2;
