mod kline;
mod provider;
mod rate_limiter;
mod storage;

pub use {
    kline::{KlineError, parse_klines, parse_ticker},
    provider::{BinanceProvider, MarketDataProvider},
    rate_limiter::WeightBudget,
    storage::{JsonFileStore, KeyValueStore, load_or, save_typed},
};
