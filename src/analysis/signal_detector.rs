use {
    crate::{
        analysis::{AlignmentResult, IndicatorSample},
        config::MIN_ALIGNED_TIMEFRAMES,
        domain::{Direction, SignalEvent},
    },
    chrono::Utc,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub volume_factor: f64,
}

/// Applies the entry rules to the entry timeframe's last two samples.
///
/// Long is evaluated first and short-circuits. The close-vs-entry-EMA filters already make
/// the two predicates disjoint; the ordering is the tie-break if those filters ever change.
pub fn detect_signal(
    symbol: &str,
    prev: &IndicatorSample,
    last: &IndicatorSample,
    alignment: &AlignmentResult,
    thresholds: &SignalThresholds,
) -> Option<SignalEvent> {
    let direction = if long_entry(prev, last, alignment, thresholds) {
        Direction::Long
    } else if short_entry(prev, last, alignment, thresholds) {
        Direction::Short
    } else {
        return None;
    };

    Some(SignalEvent {
        symbol: symbol.to_string(),
        direction,
        entry_price: last.close,
        atr_at_entry: last.atr,
        timestamp: Utc::now(),
    })
}

fn volume_surge(last: &IndicatorSample, t: &SignalThresholds) -> bool {
    last.volume > t.volume_factor * last.volume_avg
}

/// RSI climbs out of oversold with volume, above the entry EMA, with bullish alignment.
pub fn long_entry(
    prev: &IndicatorSample,
    last: &IndicatorSample,
    alignment: &AlignmentResult,
    t: &SignalThresholds,
) -> bool {
    alignment.long_count >= MIN_ALIGNED_TIMEFRAMES
        && prev.rsi < t.rsi_oversold
        && last.rsi >= t.rsi_oversold
        && volume_surge(last, t)
        && last.close > last.ema_entry
}

/// Mirror of [`long_entry`].
pub fn short_entry(
    prev: &IndicatorSample,
    last: &IndicatorSample,
    alignment: &AlignmentResult,
    t: &SignalThresholds,
) -> bool {
    alignment.short_count >= MIN_ALIGNED_TIMEFRAMES
        && prev.rsi > t.rsi_overbought
        && last.rsi <= t.rsi_overbought
        && volume_surge(last, t)
        && last.close < last.ema_entry
}
