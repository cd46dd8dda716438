//! EMA (Exponential Moving Average) indicator

/// Recursive EMA over every close, seeded by the first close.
///
/// Smoothing factor is 2 / (period + 1).
pub fn ema_series(closes: &[f64], period: u32) -> Vec<f64> {
    let Some(&first) = closes.first() else {
        return Vec::new();
    };
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut values = Vec::with_capacity(closes.len());
    let mut previous = first;
    values.push(previous);
    for &close in &closes[1..] {
        previous = alpha * close + (1.0 - alpha) * previous;
        values.push(previous);
    }
    values
}
