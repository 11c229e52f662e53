use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter},
};

/// Which Binance venue a request targets. Passed per call, never toggled on a shared client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter)]
pub enum MarketType {
    #[default]
    Futures,
    Spot,
}

impl MarketType {
    /// The venue to try when this one returns nothing.
    pub fn fallback(&self) -> MarketType {
        match self {
            MarketType::Futures => MarketType::Spot,
            MarketType::Spot => MarketType::Futures,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub last_price: f64,
    /// 24h change in percent, e.g. `-1.25`.
    pub percent_change: f64,
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn exchange_symbol(symbol: &str) -> String {
    symbol.chars().filter(|c| *c != '/').collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separator_for_exchange() {
        assert_eq!(exchange_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(exchange_symbol("eth/usdt"), "ETHUSDT");
        assert_eq!(exchange_symbol("BNBUSDT"), "BNBUSDT");
    }

    #[test]
    fn fallback_flips_venue() {
        assert_eq!(MarketType::Futures.fallback(), MarketType::Spot);
        assert_eq!(MarketType::Spot.fallback(), MarketType::Futures);
    }
}
