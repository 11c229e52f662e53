//! Debugging feature flags.

pub struct LogFlags {
    /// Per-symbol alignment counts and indicator readings on every pass.
    pub log_symbol_evaluation: bool,

    /// Every candle/ticker request sent to the exchange.
    pub log_fetches: bool,

    /// Per-channel delivery results, including successes.
    pub log_notifications: bool,

    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,

    pub log_history_flush: bool,
}

pub const DF: LogFlags = LogFlags {
    log_symbol_evaluation: true,
    log_fetches: false,
    log_notifications: true,
    log_performance: true,
    log_history_flush: false,
};
