//relative strength index with simple rolling averages of gains and losses
//position i averages the `period` price deltas ending at i, so i < period has no value
//an all-gain window (average loss of zero) reads 100 instead of dividing by zero
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return values;
    }

    //gains[k] and losses[k] belong to the delta ending at close k+1
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    for (i, value) in values.iter_mut().enumerate().skip(period) {
        let window = i - period..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        *value = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
