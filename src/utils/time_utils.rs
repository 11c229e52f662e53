use chrono::{DateTime, Local};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_3_MIN: i64 = Self::MS_IN_S * 60 * 3;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_S * 60 * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_S * 60 * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_2_H: i64 = Self::MS_IN_MIN * 60 * 2;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_6_H: i64 = Self::MS_IN_MIN * 60 * 6;
    pub const MS_IN_8_H: i64 = Self::MS_IN_MIN * 60 * 8;
    pub const MS_IN_12_H: i64 = Self::MS_IN_MIN * 60 * 12;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_3_D: i64 = Self::MS_IN_H * 24 * 3;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const MS_IN_1_M: i64 = Self::MS_IN_D * 30;
    pub const STATUS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    pub const HISTORY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Every interval Binance serves klines for, paired with its shorthand.
    const INTERVALS: [(i64, &'static str); 15] = [
        (Self::MS_IN_MIN, "1m"),
        (Self::MS_IN_3_MIN, "3m"),
        (Self::MS_IN_5_MIN, "5m"),
        (Self::MS_IN_15_MIN, "15m"),
        (Self::MS_IN_30_MIN, "30m"),
        (Self::MS_IN_H, "1h"),
        (Self::MS_IN_2_H, "2h"),
        (Self::MS_IN_4_H, "4h"),
        (Self::MS_IN_6_H, "6h"),
        (Self::MS_IN_8_H, "8h"),
        (Self::MS_IN_12_H, "12h"),
        (Self::MS_IN_D, "1d"),
        (Self::MS_IN_3_D, "3d"),
        (Self::MS_IN_W, "1w"),
        (Self::MS_IN_1_M, "1M"),
    ];

    /// Convert interval in milliseconds to a Binance-style shorthand (e.g. `30m`, `1h`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        Self::INTERVALS
            .iter()
            .find(|(ms, _)| *ms == interval_ms)
            .map(|(_, s)| *s)
            .unwrap_or("unknown")
    }

    /// Inverse of `interval_to_string`. Case matters: `1m` is a minute, `1M` a month.
    pub fn interval_from_string(text: &str) -> Option<i64> {
        Self::INTERVALS
            .iter()
            .find(|(_, s)| *s == text)
            .map(|(ms, _)| *ms)
    }
}

pub fn format_local(dt: &DateTime<Local>, fmt: &str) -> String {
    dt.format(fmt).to_string()
}

/// Formats a price as `64,123.45`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_shorthand_round_trips_for_config_values() {
        for tf in ["5m", "30m", "1h", "4h"] {
            let ms = TimeUtils::interval_from_string(tf).unwrap();
            assert_eq!(TimeUtils::interval_to_string(ms), tf);
        }
        assert_eq!(TimeUtils::interval_from_string("1M"), Some(TimeUtils::MS_IN_1_M));
        assert_eq!(TimeUtils::interval_from_string("7m"), None);
    }

    #[test]
    fn prices_get_thousands_separators() {
        assert_eq!(format_price(64123.456), "64,123.46");
        assert_eq!(format_price(999.0), "999.00");
        assert_eq!(format_price(1_000_000.0), "1,000,000.00");
        assert_eq!(format_price(0.5), "0.50");
        assert_eq!(format_price(-1234.5), "-1,234.50");
    }
}
