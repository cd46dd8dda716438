//! RSI (Relative Strength Index) indicator

pub const DEFAULT_RSI_PERIOD: u32 = 14;

/// Value reported while RSI is undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI for every close, aligned by index, using Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// The first `period` entries are neutral, as is any entry whose smoothed
/// loss average is exactly zero.
pub fn rsi_series(closes: &[f64], period: u32) -> Vec<f64> {
    let period = period as usize;
    let mut values = vec![NEUTRAL_RSI; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return values;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |change: f64| change.max(0.0);
    let loss = |change: f64| (-change).max(0.0);

    let n = period as f64;
    let mut avg_gain = changes[..period].iter().map(|&c| gain(c)).sum::<f64>() / n;
    let mut avg_loss = changes[..period].iter().map(|&c| loss(c)).sum::<f64>() / n;
    values[period] = rsi_value(avg_gain, avg_loss);

    // changes[i - 1] is the move into candle i
    for i in (period + 1)..closes.len() {
        let change = changes[i - 1];
        avg_gain = (avg_gain * (n - 1.0) + gain(change)) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss(change)) / n;
        values[i] = rsi_value(avg_gain, avg_loss);
    }

    values
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return NEUTRAL_RSI;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}
