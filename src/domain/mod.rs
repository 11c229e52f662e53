// Domain types and value objects
mod candle;
mod market;
mod signal;
mod timeframe;

pub use candle::Candle;
pub use market::{MarketType, Ticker, exchange_symbol};
pub use signal::{Direction, ExitLevels, RiskParams, SignalEvent, TradeRecord};
pub use timeframe::Timeframe;
