//! Rule-table reduction of the latest indicators to a bounded probability

use serde::{Deserialize, Serialize};

use crate::models::{EmaLine, LatestIndicators};

pub const BASE_SCORE: i32 = 50;

/// A single additive/subtractive scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoringRule {
    /// RSI below `oversold` adds `weight`, above `overbought` subtracts it.
    RsiZones {
        oversold: f64,
        overbought: f64,
        weight: i32,
    },
    /// Inside `[low, high]`, RSI above 50 adds `nudge`, below 50 subtracts it.
    RsiNeutralBand { low: f64, high: f64, nudge: i32 },
    /// Close above the EMA adds `bonus`, otherwise subtracts `penalty`.
    PriceVsEma {
        line: EmaLine,
        bonus: i32,
        #[serde(default)]
        penalty: i32,
    },
    /// Fast EMA above slow EMA adds `bonus`, otherwise subtracts `penalty`.
    EmaCross {
        fast: EmaLine,
        slow: EmaLine,
        bonus: i32,
        #[serde(default)]
        penalty: i32,
    },
}

impl ScoringRule {
    /// Score delta for this rule; rules naming an EMA that was not computed
    /// contribute nothing. Widened to `i64` so negating `i32::MIN` cannot overflow.
    pub fn contribution(&self, latest: &LatestIndicators) -> i64 {
        match *self {
            ScoringRule::RsiZones {
                oversold,
                overbought,
                weight,
            } => {
                if latest.rsi < oversold {
                    i64::from(weight)
                } else if latest.rsi > overbought {
                    -i64::from(weight)
                } else {
                    0
                }
            }
            ScoringRule::RsiNeutralBand { low, high, nudge } => {
                if latest.rsi < low || latest.rsi > high {
                    0
                } else if latest.rsi > 50.0 {
                    i64::from(nudge)
                } else if latest.rsi < 50.0 {
                    -i64::from(nudge)
                } else {
                    0
                }
            }
            ScoringRule::PriceVsEma {
                line,
                bonus,
                penalty,
            } => match latest.ema(line) {
                Some(ema) if latest.close > ema => i64::from(bonus),
                Some(_) => -i64::from(penalty),
                None => 0,
            },
            ScoringRule::EmaCross {
                fast,
                slow,
                bonus,
                penalty,
            } => match (latest.ema(fast), latest.ema(slow)) {
                (Some(f), Some(s)) if f > s => i64::from(bonus),
                (Some(_), Some(_)) => -i64::from(penalty),
                _ => 0,
            },
        }
    }
}

/// Ordered rule table applied on top of a base score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "default_base")]
    pub base: i32,
    pub rules: Vec<ScoringRule>,
}

fn default_base() -> i32 {
    BASE_SCORE
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base: BASE_SCORE,
            rules: vec![
                ScoringRule::RsiZones {
                    oversold: 30.0,
                    overbought: 70.0,
                    weight: 20,
                },
                ScoringRule::PriceVsEma {
                    line: EmaLine::Long,
                    bonus: 15,
                    penalty: 15,
                },
                ScoringRule::PriceVsEma {
                    line: EmaLine::Trend,
                    bonus: 10,
                    penalty: 10,
                },
            ],
        }
    }
}

impl ScoringRules {
    /// The lenient table of the first dashboard revision: bonuses only.
    pub fn lenient() -> Self {
        Self {
            base: BASE_SCORE,
            rules: vec![
                ScoringRule::RsiZones {
                    oversold: 30.0,
                    overbought: 70.0,
                    weight: 20,
                },
                ScoringRule::PriceVsEma {
                    line: EmaLine::Long,
                    bonus: 15,
                    penalty: 0,
                },
                ScoringRule::EmaCross {
                    fast: EmaLine::Short,
                    slow: EmaLine::Long,
                    bonus: 10,
                    penalty: 0,
                },
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Each rule's delta, in table order.
    pub fn breakdown(&self, latest: &LatestIndicators) -> Vec<(ScoringRule, i64)> {
        self.rules
            .iter()
            .map(|rule| (rule.clone(), rule.contribution(latest)))
            .collect()
    }

    pub fn score(&self, latest: &LatestIndicators) -> u8 {
        let raw = self
            .rules
            .iter()
            .fold(i64::from(self.base), |acc, rule| {
                acc.saturating_add(rule.contribution(latest))
            });
        clamp_probability(raw)
    }
}

/// Clamp a raw score to the [0, 100] probability range.
pub fn clamp_probability(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}
