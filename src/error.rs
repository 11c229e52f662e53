use thiserror::Error;

/// Everything that can go wrong inside a scan pass. None of these stop the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Too few candles for the slowest indicator to warm up.
    #[error("insufficient data: {context} has {available} candles, needs {required}")]
    DataUnavailable {
        context: String,
        available: usize,
        required: usize,
    },

    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("fetch for {symbol} timed out after {secs}s")]
    Timeout { symbol: String, secs: u64 },

    #[error("channel {channel} failed: {reason}")]
    Notification { channel: String, reason: String },

    #[error("could not persist {key}: {reason}")]
    Persistence { key: String, reason: String },
}

impl SignalError {
    pub fn data_unavailable(context: impl Into<String>, available: usize, required: usize) -> Self {
        SignalError::DataUnavailable {
            context: context.into(),
            available,
            required,
        }
    }

    /// DataUnavailable is routine (new listings, thin history); the rest deserve attention.
    pub fn is_routine(&self) -> bool {
        matches!(self, SignalError::DataUnavailable { .. })
    }
}
