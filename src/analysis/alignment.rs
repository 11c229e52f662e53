use crate::analysis::IndicatorSeries;

/// How many higher timeframes vote bullish vs bearish on EMA trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentResult {
    pub long_count: usize,
    pub short_count: usize,
}

/// Looks only at the newest sample of each series: short EMA above long EMA is a long vote,
/// below is a short vote. Ties, warm-up gaps and missing series (`None`) vote for neither.
pub fn scan_alignment<'a, I>(higher_timeframes: I) -> AlignmentResult
where
    I: IntoIterator<Item = Option<&'a IndicatorSeries>>,
{
    higher_timeframes
        .into_iter()
        .filter_map(|series| series.and_then(IndicatorSeries::latest))
        .fold(AlignmentResult::default(), |mut acc, sample| {
            if sample.ema_short > sample.ema_long {
                acc.long_count += 1;
            } else if sample.ema_short < sample.ema_long {
                acc.short_count += 1;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{IndicatorParams, candles_from_closes};

    const PARAMS: IndicatorParams = IndicatorParams {
        short_period: 3,
        long_period: 6,
        entry_period: 3,
        rsi_period: 3,
        atr_period: 3,
        volume_avg_period: 3,
    };

    fn trending(step: f64) -> IndicatorSeries {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + step * i as f64).collect();
        IndicatorSeries::compute(&candles_from_closes(&closes), &PARAMS).unwrap()
    }

    #[test]
    fn two_of_three_bullish() {
        let up_a = trending(1.0);
        let up_b = trending(0.5);
        let flat = trending(0.0);
        let result = scan_alignment([Some(&up_a), Some(&up_b), Some(&flat)]);
        assert_eq!(
            result,
            AlignmentResult {
                long_count: 2,
                short_count: 0
            }
        );
    }

    #[test]
    fn missing_timeframes_count_for_neither() {
        let down = trending(-1.0);
        let result = scan_alignment([Some(&down), None, None]);
        assert_eq!(result.long_count, 0);
        assert_eq!(result.short_count, 1);
        assert!(result.long_count + result.short_count <= 3);
    }

    #[test]
    fn empty_input_is_neutral() {
        assert_eq!(
            scan_alignment(std::iter::empty::<Option<&IndicatorSeries>>()),
            AlignmentResult::default()
        );
    }
}
