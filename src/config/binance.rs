use std::time::Duration;

/// REST constraints: candle window, weight budget, call costs, and fetch concurrency.
pub struct RestLimits {
    /// Candles requested per fetch. 201 keeps a 200-period EMA warm for the last two samples.
    pub candle_window: u32,
    pub weight_limit_minute: u32,
    pub kline_call_weight: u32,
    pub ticker_call_weight: u32,
    /// Symbols whose candles may be in flight at once during a pass.
    pub concurrent_symbol_fetches: usize,
}

pub struct Endpoints {
    pub futures_base_url: &'static str,
    pub spot_base_url: &'static str,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    /// Upper bound on fetching every timeframe for one symbol.
    pub symbol_fetch_timeout: Duration,
}

pub struct BinanceConfig {
    pub limits: RestLimits,
    pub endpoints: Endpoints,
    pub client: ClientDefaults,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        candle_window: 201,
        weight_limit_minute: 2400,
        kline_call_weight: 2,
        ticker_call_weight: 1,
        concurrent_symbol_fetches: 3,
    },
    endpoints: Endpoints {
        futures_base_url: "https://fapi.binance.com/fapi/v1",
        spot_base_url: "https://api.binance.com/api/v3",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        symbol_fetch_timeout: Duration::from_secs(30),
    },
};

/// Symbol the synthetic-signal and connectivity checks price against.
pub const REFERENCE_SYMBOL: &str = "BTC/USDT";
