//! Market scenarios through indicators and scoring

use crate::common_fixtures::{decline_then_flat, rising_closes, series_from_closes};
use market_pulse::core::pipeline::snapshot_from_series;
use market_pulse::indicators::{IndicatorEngine, IndicatorParams};
use market_pulse::models::Timeframe;
use market_pulse::signals::ScoringRules;

#[test]
fn test_decline_then_flat_is_bearish() {
    let series = series_from_closes(&decline_then_flat(20, 40));
    let params = IndicatorParams::default();

    let set = IndicatorEngine::compute(&series, &params);
    let latest = set.latest().unwrap();
    assert!(latest.rsi < 30.0, "RSI should trend toward 0, got {}", latest.rsi);
    assert!(latest.ema_short < latest.ema_long);

    let snapshot = snapshot_from_series(&series, Timeframe::OneHour, &params, &ScoringRules::default());
    // 50 + 20 (oversold) - 15 (below EMA21) - 10 (below EMA50)
    assert_eq!(snapshot.probability, 45);
    assert!(snapshot.probability <= 50);
    assert_eq!(snapshot.price, 80.0);
    assert_eq!(snapshot.timeframe, Timeframe::OneHour);
}

#[test]
fn test_rsi_trends_down_through_the_decline() {
    let series = series_from_closes(&decline_then_flat(20, 10));
    let set = IndicatorEngine::compute(&series, &IndicatorParams::default());
    assert!(set.rsi[14..=20].iter().all(|&v| v == 0.0));
    assert!(set.rsi[20..].iter().all(|&v| v < 30.0));
}

#[test]
fn test_steady_uptrend_is_bullish() {
    let series = series_from_closes(&rising_closes(100, 100.0, 0.5));
    let snapshot = snapshot_from_series(
        &series,
        Timeframe::FifteenMinutes,
        &IndicatorParams::default(),
        &ScoringRules::default(),
    );
    // Zero losses keep RSI neutral; price leads both EMAs
    assert_eq!(snapshot.rsi, 50.0);
    assert!(snapshot.ema_short > snapshot.ema_long);
    assert_eq!(snapshot.probability, 75);
}

#[test]
fn test_short_series_snapshot_uses_close_for_emas() {
    let closes = rising_closes(10, 200.0, 1.0);
    let snapshot = snapshot_from_series(
        &series_from_closes(&closes),
        Timeframe::FiveMinutes,
        &IndicatorParams::default(),
        &ScoringRules::default(),
    );
    assert_eq!(snapshot.rsi, 50.0);
    assert_eq!(snapshot.price, 209.0);
    assert_eq!(snapshot.ema_short, 209.0);
    assert_eq!(snapshot.ema_long, 209.0);
    assert!(snapshot.probability <= 100);
}
