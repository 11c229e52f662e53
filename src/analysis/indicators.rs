//! Indicator engine: EMA, RSI, ATR and rolling volume mean over a candle window.
//!
//! Every series has the same length as the input. Entries before an indicator's
//! warm-up are `NaN` and never surface through [`IndicatorSeries::sample`].
//!
//! Warm-up (index of the first defined value):
//! - EMA(p): p - 1, seeded with the SMA of the first p closes
//! - RSI(p): p, Wilder smoothing seeded with the mean of the first p changes
//! - ATR(p): p, Wilder smoothing seeded with the mean of true ranges 1..=p
//! - SMA(p): p - 1

use crate::{domain::Candle, error::SignalError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub short_period: usize,
    pub long_period: usize,
    pub entry_period: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub volume_avg_period: usize,
}

impl IndicatorParams {
    /// Shortest window for which the newest sample is fully defined.
    pub fn min_candles(&self) -> usize {
        [
            self.short_period,
            self.long_period,
            self.entry_period,
            self.rsi_period + 1,
            self.atr_period + 1,
            self.volume_avg_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
        .max(1)
    }
}

/// Indicator readings for one candle, all defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSample {
    pub close: f64,
    pub volume: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub ema_entry: f64,
    pub rsi: f64,
    pub atr: f64,
    pub volume_avg: f64,
}

impl IndicatorSample {
    fn all_finite(&self) -> bool {
        [
            self.close,
            self.volume,
            self.ema_short,
            self.ema_long,
            self.ema_entry,
            self.rsi,
            self.atr,
            self.volume_avg,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    closes: Vec<f64>,
    volumes: Vec<f64>,
    ema_short: Vec<f64>,
    ema_long: Vec<f64>,
    ema_entry: Vec<f64>,
    rsi: Vec<f64>,
    atr: Vec<f64>,
    volume_avg: Vec<f64>,
}

impl IndicatorSeries {
    /// Fails with `DataUnavailable` rather than returning a half-warm series.
    pub fn compute(candles: &[Candle], params: &IndicatorParams) -> Result<Self, SignalError> {
        let required = params.min_candles();
        if candles.len() < required {
            return Err(SignalError::data_unavailable(
                "candle series",
                candles.len(),
                required,
            ));
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        Ok(Self {
            ema_short: ema(&closes, params.short_period),
            ema_long: ema(&closes, params.long_period),
            ema_entry: ema(&closes, params.entry_period),
            rsi: rsi(&closes, params.rsi_period),
            atr: atr(candles, params.atr_period),
            volume_avg: sma(&volumes, params.volume_avg_period),
            closes,
            volumes,
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// `None` while any indicator at `idx` is still warming up.
    pub fn sample(&self, idx: usize) -> Option<IndicatorSample> {
        if idx >= self.len() {
            return None;
        }
        let sample = IndicatorSample {
            close: self.closes[idx],
            volume: self.volumes[idx],
            ema_short: self.ema_short[idx],
            ema_long: self.ema_long[idx],
            ema_entry: self.ema_entry[idx],
            rsi: self.rsi[idx],
            atr: self.atr[idx],
            volume_avg: self.volume_avg[idx],
        };
        sample.all_finite().then_some(sample)
    }

    pub fn latest(&self) -> Option<IndicatorSample> {
        self.len().checked_sub(1).and_then(|i| self.sample(i))
    }

    /// `(prev, last)`; both must be fully defined.
    pub fn last_two(&self) -> Option<(IndicatorSample, IndicatorSample)> {
        let last_idx = self.len().checked_sub(1)?;
        let prev_idx = last_idx.checked_sub(1)?;
        Some((self.sample(prev_idx)?, self.sample(last_idx)?))
    }
}

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        // Increment form keeps a flat series exactly flat.
        prev += alpha * (values[i] - prev);
        result[i] = prev;
    }
    result
}

pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mut window_sum: f64 = values[..period].iter().sum();
    result[period - 1] = window_sum / period as f64;
    for i in period..n {
        window_sum += values[i] - values[i - period];
        result[i] = window_sum / period as f64;
    }
    result
}

pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = rsi_from_averages(avg_gain, avg_loss);

    let p = period as f64;
    for i in (period + 1)..n {
        let change = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }
    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        50.0 // flat window
    } else {
        100.0 * avg_gain / total
    }
}

pub fn atr(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let true_range = |i: usize| candles[i].true_range(candles[i - 1].close);

    let seed = (1..=period).map(true_range).sum::<f64>() / period as f64;
    result[period] = seed;

    let p = period as f64;
    let mut prev = seed;
    for i in (period + 1)..n {
        prev = (prev * (p - 1.0) + true_range(i)) / p;
        result[i] = prev;
    }
    result
}
