use serde::{Deserialize, Serialize};

/// One OHLCV bar. Series are ordered oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(open_time_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle {
            open_time_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Greatest of the bar's own range and its gaps from the previous close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let range = self.high - self.low;
        let gap_up = (self.high - prev_close).abs();
        let gap_down = (self.low - prev_close).abs();
        range.max(gap_up).max(gap_down)
    }
}
