use {
    crate::utils::TimeUtils,
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// A candle aggregation interval, stored as milliseconds and spoken as Binance shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    interval_ms: i64,
}

impl Timeframe {
    /// Callers pass one of the `TimeUtils::MS_IN_*` constants.
    pub(crate) const fn from_interval_ms(interval_ms: i64) -> Self {
        Timeframe { interval_ms }
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// The string the kline endpoint expects for `interval=`.
    pub fn as_str(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeUtils::interval_from_string(s.trim())
            .map(|interval_ms| Timeframe { interval_ms })
            .ok_or_else(|| format!("Unsupported timeframe: {:?}", s))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.as_str().to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
