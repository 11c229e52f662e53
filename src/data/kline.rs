//! Binance REST payloads -> domain types. Spot and USD-M futures share these shapes.

use {
    crate::domain::{Candle, Ticker},
    serde_json::Value,
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq)]
pub enum KlineError {
    #[error("expected a JSON array of klines")]
    NotAnArray,
    #[error("kline {index}: row has {len} fields, need at least 6")]
    InvalidLength { index: usize, len: usize },
    #[error("kline {index}: field `{field}` is not a valid number")]
    InvalidType { index: usize, field: &'static str },
    #[error("ticker payload missing `{0}`")]
    MissingTickerField(&'static str),
    #[error("klines out of order or duplicated at {0}")]
    OutOfOrder(usize),
}

const PRICE_FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Binance sends prices as strings; accept bare numbers too.
fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn parse_row(index: usize, row: &Value) -> Result<Candle, KlineError> {
    let fields = row.as_array().ok_or(KlineError::InvalidLength { index, len: 0 })?;
    if fields.len() < 6 {
        return Err(KlineError::InvalidLength {
            index,
            len: fields.len(),
        });
    }

    let open_time_ms = fields[0].as_i64().ok_or(KlineError::InvalidType {
        index,
        field: "open_time",
    })?;

    let mut values = [0.0; 5];
    for (slot, (field, name)) in values.iter_mut().zip(fields[1..6].iter().zip(PRICE_FIELDS)) {
        *slot = as_f64(field).ok_or(KlineError::InvalidType { index, field: name })?;
    }
    let [open, high, low, close, volume] = values;

    Ok(Candle::new(open_time_ms, open, high, low, close, volume))
}

/// Whole payload or nothing: one bad row fails the fetch.
pub fn parse_klines(payload: &Value) -> Result<Vec<Candle>, KlineError> {
    let rows = payload.as_array().ok_or(KlineError::NotAnArray)?;
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(i) = candles
        .windows(2)
        .position(|w| w[1].open_time_ms <= w[0].open_time_ms)
    {
        return Err(KlineError::OutOfOrder(i + 1));
    }
    Ok(candles)
}

/// `GET /ticker/24hr?symbol=...` body.
pub fn parse_ticker(payload: &Value) -> Result<Ticker, KlineError> {
    let last_price = as_f64(&payload["lastPrice"]).ok_or(KlineError::MissingTickerField("lastPrice"))?;
    let percent_change = as_f64(&payload["priceChangePercent"])
        .ok_or(KlineError::MissingTickerField("priceChangePercent"))?;
    Ok(Ticker {
        last_price,
        percent_change,
    })
}
