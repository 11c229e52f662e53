mod alignment;
mod indicators;
mod signal_detector;

pub use alignment::{AlignmentResult, scan_alignment};
pub use indicators::{IndicatorParams, IndicatorSample, IndicatorSeries, atr, ema, rsi, sma};
pub use signal_detector::{SignalThresholds, detect_signal, long_entry, short_entry};

#[cfg(test)]
pub(crate) fn candles_from_closes(closes: &[f64]) -> Vec<crate::domain::Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| crate::domain::Candle::new(i as i64 * 60_000, c, c + 1.0, c - 1.0, c, 1_000.0))
        .collect()
}
