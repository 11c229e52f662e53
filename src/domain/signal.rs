use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    strum_macros::Display,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Direction {
    Long,
    Short,
}

/// A detected entry. Built only by the detector; consumed once by recorder and dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub atr_at_entry: f64,
    pub timestamp: DateTime<Utc>,
}

/// ATR multiples applied to the entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParams {
    pub atr_stop_loss_factor: f64,
    pub atr_take_profit_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl ExitLevels {
    pub fn from_atr(direction: Direction, entry: f64, atr: f64, risk: &RiskParams) -> Self {
        let stop_distance = atr * risk.atr_stop_loss_factor;
        let target_distance = atr * risk.atr_take_profit_factor;
        match direction {
            Direction::Long => ExitLevels {
                stop_loss: entry - stop_distance,
                take_profit: entry + target_distance,
            },
            Direction::Short => ExitLevels {
                stop_loss: entry + stop_distance,
                take_profit: entry - target_distance,
            },
        }
    }
}

/// Persisted history row. The take-profit level only travels in the notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss_price: f64,
}

impl TradeRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        symbol: String,
        direction: Direction,
        entry_price: f64,
        stop_loss_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            symbol,
            direction,
            entry_price,
            stop_loss_price,
        }
    }
}
