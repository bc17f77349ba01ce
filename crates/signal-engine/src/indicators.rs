/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Exponential Moving Average
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len() - period + 1);

    // Seed with the SMA of the first window.
    let seed: f64 = data[..period].iter().sum::<f64>() / period as f64;
    result.push(seed);

    for value in &data[period..] {
        let prev = result[result.len() - 1];
        result.push((value - prev) * multiplier + prev);
    }
    result
}

/// Relative Strength Index over mean gain / mean loss of the trailing window.
/// A window with no losses (including the flat 0/0 case) reads as RSI 100.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);
    for pair in data.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut result = Vec::with_capacity(gains.len() - period + 1);
    for i in period - 1..gains.len() {
        let avg_gain: f64 = gains[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[i + 1 - period..=i].iter().sum::<f64>() / period as f64;

        if avg_loss == 0.0 {
            result.push(100.0);
        } else {
            let rs = avg_gain / avg_loss;
            result.push(100.0 - (100.0 / (1.0 + rs)));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_of_constant_series_is_constant() {
        let data = vec![10.0; 25];
        let out = sma(&data, 20);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| (v - 10.0).abs() < 1e-9));
    }

    #[test]
    fn sma_short_series_is_empty() {
        assert!(sma(&[1.0, 2.0], 20).is_empty());
    }

    #[test]
    fn ema_tracks_a_step_up() {
        let mut data = vec![10.0; 20];
        data.extend([20.0; 10]);
        let out = ema(&data, 20);
        let last = *out.last().unwrap();
        assert!(last > 10.0 && last < 20.0);
    }

    #[test]
    fn rsi_monotonic_rise_is_100() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&data, 14);
        assert_eq!(*out.last().unwrap(), 100.0);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // No gains and no losses; the diverging ratio reads as 100.
        let data = vec![50.0; 20];
        let out = rsi(&data, 14);
        assert_eq!(*out.last().unwrap(), 100.0);
    }

    #[test]
    fn rsi_alternating_moves_is_50() {
        let mut data = Vec::new();
        for i in 0..30 {
            data.push(if i % 2 == 0 { 100.0 } else { 101.0 });
        }
        let out = rsi(&data, 14);
        assert!((out.last().unwrap() - 50.0).abs() < 1e-9);
    }
}
