use {
    crate::{domain::MarketType, utils::{TimeUtils, format_local}},
    chrono::{DateTime, Local},
    serde::Serialize,
    std::sync::{PoisonError, RwLock},
    strum_macros::Display,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum ConnectivityStatus {
    #[strum(serialize = "Initializing...")]
    Initializing,
    Connected,
    Failed,
    #[strum(serialize = "Price Fetch Failed")]
    PriceFetchFailed,
}

/// Process-wide run metadata. Readers only ever see clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    pub last_check_time: Option<DateTime<Local>>,
    pub open_trade_count: usize,
    pub last_error: Option<String>,
    pub connectivity: ConnectivityStatus,
    /// Venue prices were last read from, e.g. `Futures` or `Spot (Fallback)`.
    pub market_label: String,
}

impl RunState {
    pub fn new(market: MarketType) -> Self {
        Self {
            last_check_time: None,
            open_trade_count: 0,
            last_error: None,
            connectivity: ConnectivityStatus::Initializing,
            market_label: market.to_string(),
        }
    }

    pub fn last_check_display(&self) -> String {
        self.last_check_time
            .as_ref()
            .map(|t| format_local(t, TimeUtils::STATUS_TIME_FORMAT))
            .unwrap_or_else(|| "Never".to_string())
    }
}

/// Lock wrapper. Writers hold the lock only for the closure, never across an await.
#[derive(Debug)]
pub(crate) struct SharedRunState(RwLock<RunState>);

impl SharedRunState {
    pub(crate) fn new(state: RunState) -> Self {
        Self(RwLock::new(state))
    }

    pub(crate) fn snapshot(&self) -> RunState {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut RunState) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
