//! Unit tests for probability scoring

use market_pulse::models::{EmaLine, LatestIndicators};
use market_pulse::signals::{clamp_probability, ScoringRule, ScoringRules};

fn latest(close: f64, rsi: f64, ema_short: f64, ema_long: f64, ema_trend: Option<f64>) -> LatestIndicators {
    LatestIndicators {
        close,
        rsi,
        ema_short,
        ema_long,
        ema_trend,
    }
}

#[test]
fn test_default_table_best_case() {
    let rules = ScoringRules::default();
    let oversold_above_all = latest(110.0, 25.0, 105.0, 100.0, Some(90.0));
    assert_eq!(rules.score(&oversold_above_all), 95);
}

#[test]
fn test_default_table_worst_case() {
    let rules = ScoringRules::default();
    let overbought_below_all = latest(80.0, 75.0, 85.0, 90.0, Some(100.0));
    assert_eq!(rules.score(&overbought_below_all), 5);
}

#[test]
fn test_default_table_neutral_rsi() {
    let rules = ScoringRules::default();
    // 50 + 15 (above EMA21) - 10 (below EMA50)
    assert_eq!(rules.score(&latest(100.0, 50.0, 99.0, 98.0, Some(120.0))), 55);
}

#[test]
fn test_missing_trend_ema_contributes_nothing() {
    let rules = ScoringRules::default();
    assert_eq!(rules.score(&latest(110.0, 25.0, 105.0, 100.0, None)), 85);
}

#[test]
fn test_adversarial_weights_clamp_high() {
    let rules = ScoringRules {
        base: 90,
        rules: vec![
            ScoringRule::RsiZones {
                oversold: 30.0,
                overbought: 70.0,
                weight: i32::MAX,
            },
            ScoringRule::PriceVsEma {
                line: EmaLine::Trend,
                bonus: i32::MAX,
                penalty: 0,
            },
        ],
    };
    // RSI < 30 and close far above EMA50
    let probability = rules.score(&latest(1_000_000.0, 5.0, 10.0, 10.0, Some(1.0)));
    assert_eq!(probability, 100);
}

#[test]
fn test_adversarial_weights_clamp_low() {
    let rules = ScoringRules {
        base: 0,
        rules: vec![ScoringRule::PriceVsEma {
            line: EmaLine::Long,
            bonus: 0,
            penalty: i32::MAX,
        }],
    };
    assert_eq!(rules.score(&latest(1.0, 50.0, 2.0, 2.0, None)), 0);
}

#[test]
fn test_minimum_weights_from_json_clamp_instead_of_overflowing() {
    let json = r#"{
        "rules": [
            { "rule": "rsi_zones", "oversold": 30.0, "overbought": 70.0, "weight": -2147483648 },
            { "rule": "price_vs_ema", "line": "long", "bonus": 0, "penalty": -2147483648 },
            { "rule": "ema_cross", "fast": "short", "slow": "long", "bonus": 0, "penalty": -2147483648 }
        ]
    }"#;
    let rules = ScoringRules::from_json(json).unwrap();

    // Overbought, below EMA21, EMA9 under EMA21: every rule negates i32::MIN
    let overbought_below = latest(80.0, 80.0, 85.0, 90.0, None);
    assert_eq!(rules.score(&overbought_below), 100);
    let deltas: Vec<i64> = rules
        .breakdown(&overbought_below)
        .into_iter()
        .map(|(_, delta)| delta)
        .collect();
    assert_eq!(deltas, vec![2_147_483_648; 3]);

    // Oversold adds the raw minimum weight
    assert_eq!(rules.score(&latest(100.0, 20.0, 101.0, 99.0, None)), 0);
    // ...which a negated minimum penalty cancels out
    assert_eq!(rules.score(&latest(100.0, 20.0, 95.0, 99.0, None)), 50);
}

#[test]
fn test_lenient_table_never_penalises() {
    let rules = ScoringRules::lenient();
    assert_eq!(rules.score(&latest(80.0, 50.0, 85.0, 90.0, None)), 50);
    // 50 + 20 + 15 + 10
    assert_eq!(rules.score(&latest(110.0, 20.0, 105.0, 100.0, None)), 95);
}

#[test]
fn test_breakdown_in_table_order() {
    let rules = ScoringRules::default();
    let deltas: Vec<i64> = rules
        .breakdown(&latest(80.0, 75.0, 85.0, 90.0, Some(100.0)))
        .into_iter()
        .map(|(_, delta)| delta)
        .collect();
    assert_eq!(deltas, vec![-20, -15, -10]);
}

#[test]
fn test_rules_load_from_json() {
    let json = r#"{
        "rules": [
            { "rule": "rsi_zones", "oversold": 25.0, "overbought": 75.0, "weight": 25 },
            { "rule": "rsi_neutral_band", "low": 45.0, "high": 55.0, "nudge": 5 },
            { "rule": "ema_cross", "fast": "short", "slow": "long", "bonus": 10 }
        ]
    }"#;
    let rules = ScoringRules::from_json(json).unwrap();
    assert_eq!(rules.base, 50);
    assert_eq!(rules.rules.len(), 3);
    // 50 - 5 (RSI 48 inside the band) - 0 (cross penalty defaults to 0)
    assert_eq!(rules.score(&latest(100.0, 48.0, 90.0, 95.0, None)), 45);
    assert!(ScoringRules::from_json(r#"{ "rules": [{ "rule": "volume_spike" }] }"#).is_err());
}

#[test]
fn test_clamp_probability() {
    assert_eq!(clamp_probability(-40), 0);
    assert_eq!(clamp_probability(0), 0);
    assert_eq!(clamp_probability(73), 73);
    assert_eq!(clamp_probability(100), 100);
    assert_eq!(clamp_probability(i64::MAX), 100);
}
