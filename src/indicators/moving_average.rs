//simple moving average over a close series
//position i holds the mean of closes[i+1-window..=i], earlier positions have no value
//each window is summed from scratch so no rounding drift builds up along the series
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    closes
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &closes[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

//smoothing constant for an exponential moving average
pub fn ema_alpha(window: usize, smoothing: f64) -> f64 {
    smoothing / (1.0 + window as f64)
}

//exponential moving average seeded with the first close
//EMA[0] = close[0], EMA[i] = alpha*close[i] + (1-alpha)*EMA[i-1]
pub fn ema(closes: &[f64], window: usize, smoothing: f64) -> Vec<f64> {
    let alpha = ema_alpha(window, smoothing);
    let mut values = Vec::with_capacity(closes.len());

    let mut prev = match closes.first() {
        Some(&first) => first,
        None => return values,
    };
    values.push(prev);

    for &close in &closes[1..] {
        prev = alpha * close + (1.0 - alpha) * prev;
        values.push(prev);
    }

    values
}
