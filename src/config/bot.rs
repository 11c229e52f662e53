//! Runtime trading configuration (persisted, editable while running)

use {
    crate::{
        analysis::{IndicatorParams, SignalThresholds},
        config::{BINANCE, TelegramAccount},
        domain::{MarketType, RiskParams, Timeframe},
        utils::TimeUtils,
    },
    anyhow::{Context, Result, bail},
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// A notification target as the user configured it. Credentials live elsewhere, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: u32,
    #[serde(rename = "name")]
    pub display_name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub active_symbols: Vec<String>,
    pub entry_timeframe: Timeframe,
    pub higher_timeframes: Vec<Timeframe>,
    pub max_open_trades: usize,
    pub market_type: MarketType,

    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub volume_avg_period: usize,
    pub volume_factor: f64,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub ema_entry_period: usize,
    pub atr_period: usize,

    pub atr_stop_loss_factor: f64,
    pub atr_take_profit_factor: f64,

    pub telegram_channels: Vec<ChannelConfig>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            active_symbols: vec!["BTC/USDT".to_string(), "ETH/USDT".to_string()],
            entry_timeframe: Timeframe::from_interval_ms(TimeUtils::MS_IN_5_MIN),
            higher_timeframes: vec![
                Timeframe::from_interval_ms(TimeUtils::MS_IN_30_MIN),
                Timeframe::from_interval_ms(TimeUtils::MS_IN_H),
                Timeframe::from_interval_ms(TimeUtils::MS_IN_4_H),
            ],
            max_open_trades: 2,
            market_type: MarketType::Futures,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_avg_period: 20,
            volume_factor: 1.5,
            ema_short_period: 50,
            ema_long_period: 200,
            ema_entry_period: 20,
            atr_period: 14,
            atr_stop_loss_factor: 1.0,
            atr_take_profit_factor: 2.0,
            telegram_channels: Vec::new(),
        }
    }
}

impl BotConfig {
    /// Defaults plus one channel per discovered account; only the first starts active.
    pub fn defaults_for(accounts: &[TelegramAccount]) -> Self {
        let telegram_channels = accounts
            .iter()
            .enumerate()
            .map(|(i, acc)| ChannelConfig {
                id: acc.id,
                display_name: acc.name.clone(),
                active: i == 0,
            })
            .collect();
        Self {
            telegram_channels,
            ..Self::default()
        }
    }

    /// Shallow merge: every top-level key in `patch` replaces the current value.
    pub fn merged(&self, patch: Value) -> Result<Self> {
        let Value::Object(patch) = patch else {
            bail!("settings patch must be a JSON object");
        };
        let mut base = serde_json::to_value(self).context("serializing current config")?;
        if let Value::Object(fields) = &mut base {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        let merged: BotConfig =
            serde_json::from_value(base).context("settings patch does not fit the config shape")?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("volume_avg_period", self.volume_avg_period),
            ("ema_short_period", self.ema_short_period),
            ("ema_long_period", self.ema_long_period),
            ("ema_entry_period", self.ema_entry_period),
            ("atr_period", self.atr_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            bail!("{} must be at least 1", name);
        }
        if self.rsi_oversold >= self.rsi_overbought {
            bail!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold,
                self.rsi_overbought
            );
        }
        // Entry detection needs one candle beyond warm-up, all inside one fetch window.
        let required = self.indicator_params().min_candles() + 1;
        let window = BINANCE.limits.candle_window as usize;
        if required > window {
            bail!(
                "indicator periods need {} candles but only {} are fetched per timeframe",
                required,
                window
            );
        }
        Ok(())
    }

    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            short_period: self.ema_short_period,
            long_period: self.ema_long_period,
            entry_period: self.ema_entry_period,
            rsi_period: self.rsi_period,
            atr_period: self.atr_period,
            volume_avg_period: self.volume_avg_period,
        }
    }

    pub fn thresholds(&self) -> SignalThresholds {
        SignalThresholds {
            rsi_oversold: self.rsi_oversold,
            rsi_overbought: self.rsi_overbought,
            volume_factor: self.volume_factor,
        }
    }

    pub fn risk(&self) -> RiskParams {
        RiskParams {
            atr_stop_loss_factor: self.atr_stop_loss_factor,
            atr_take_profit_factor: self.atr_take_profit_factor,
        }
    }

    pub fn active_channels(&self) -> Vec<ChannelConfig> {
        self.telegram_channels
            .iter()
            .filter(|ch| ch.active)
            .cloned()
            .collect()
    }
}
