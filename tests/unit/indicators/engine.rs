//! Unit tests for the indicator engine

use crate::common_fixtures::{rising_closes, series_from_closes};
use market_pulse::indicators::{IndicatorEngine, IndicatorParams, MIN_INDICATOR_CANDLES};
use market_pulse::models::CandleSeries;

#[test]
fn test_short_series_degrades_to_neutral() {
    let closes = rising_closes(MIN_INDICATOR_CANDLES - 1, 100.0, -2.0);
    let set = IndicatorEngine::compute(&series_from_closes(&closes), &IndicatorParams::default());

    assert_eq!(set.len(), closes.len());
    assert!(set.rsi.iter().all(|&v| v == 50.0));
    assert_eq!(set.ema_short, closes);
    assert_eq!(set.ema_long, closes);
    assert_eq!(set.ema_trend.as_deref(), Some(closes.as_slice()));
}

#[test]
fn test_empty_series_has_no_latest() {
    let series = CandleSeries::new(Vec::new()).unwrap();
    let set = IndicatorEngine::compute(&series, &IndicatorParams::default());
    assert!(set.is_empty());
    assert!(set.latest().is_none());
}

#[test]
fn test_series_are_aligned_with_candles() {
    let closes = rising_closes(100, 50.0, 0.3);
    let set = IndicatorEngine::compute(&series_from_closes(&closes), &IndicatorParams::default());

    assert_eq!(set.rsi.len(), 100);
    assert_eq!(set.ema_short.len(), 100);
    assert_eq!(set.ema_long.len(), 100);
    assert_eq!(set.ema_trend.as_ref().map(Vec::len), Some(100));

    let latest = set.latest().unwrap();
    assert_eq!(latest.close, *closes.last().unwrap());
    assert!(latest.ema_short > latest.ema_long);
}

#[test]
fn test_trend_ema_is_optional() {
    let params = IndicatorParams {
        ema_trend: None,
        ..IndicatorParams::default()
    };
    let set = IndicatorEngine::compute(&series_from_closes(&rising_closes(60, 10.0, 0.1)), &params);
    assert!(set.ema_trend.is_none());
    assert!(set.latest().unwrap().ema_trend.is_none());
}

#[test]
fn test_rsi_bounded_for_any_well_formed_series() {
    for len in [14usize, 15, 50, 100] {
        let closes: Vec<f64> = (0..len)
            .map(|i| 1000.0 + ((i * 7919) % 101) as f64 - 50.0)
            .collect();
        let set = IndicatorEngine::compute(&series_from_closes(&closes), &IndicatorParams::default());
        assert!(set.rsi.iter().all(|v| (0.0..=100.0).contains(v)));
    }
}

#[test]
fn test_lookback_never_below_minimum() {
    let params = IndicatorParams {
        rsi_period: 5,
        ..IndicatorParams::default()
    };
    assert_eq!(params.lookback(), MIN_INDICATOR_CANDLES);
    assert_eq!(IndicatorParams::default().lookback(), 14);
}
