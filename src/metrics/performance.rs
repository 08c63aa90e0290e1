use statrs::statistics::Statistics;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//replaces nan and infinities with 0
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn sanitize_all(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| sanitize(*v)).collect()
}

//simple period returns close[i]/close[i-1] - 1, none at i = 0
pub fn period_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return returns;
    }
    returns.push(None);
    returns.extend(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));
    returns
}

//strategy returns sr[i] = r[i] * signal[i-1]
//the signal known at the close of bar i-1 earns the return of bar i
pub fn strategy_returns(closes: &[f64], signals: &[f64]) -> Vec<Option<f64>> {
    period_returns(closes)
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let r = r?;
            let signal = signals.get(i.checked_sub(1)?)?;
            Some(r * signal)
        })
        .collect()
}

//equity multiple after each bar, starting from 1 before the first bar
//missing or non-finite strategy returns leave the equity unchanged
//a step that would overflow holds the last finite value, so every point is finite
pub fn equity_curve(strategy_returns: &[Option<f64>]) -> Vec<f64> {
    let mut equity = 1.0;
    strategy_returns
        .iter()
        .map(|sr| {
            let next = equity * (1.0 + sr.filter(|r| r.is_finite()).unwrap_or(0.0));
            if next.is_finite() {
                equity = next;
            }
            equity
        })
        .collect()
}

//annualized sharpe ratio sqrt(252) * mean / sample standard deviation
//0 with fewer than two observations or zero deviation
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    sanitize(TRADING_DAYS_PER_YEAR.sqrt() * mean / std_dev)
}

//drawdown at each point, equity over its running peak minus 1
pub fn drawdowns(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|&e| {
            if e > peak {
                peak = e;
            }
            e / peak - 1.0
        })
        .collect()
}

//largest peak to trough decline, a non-positive fraction
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let worst = drawdowns(equity)
        .into_iter()
        .map(sanitize)
        .fold(0.0, f64::min);
    sanitize(worst)
}

//fraction of periods where a non-zero signal was applied
pub fn exposure(signals: &[f64]) -> f64 {
    if signals.len() < 2 {
        return 0.0;
    }
    let applied = &signals[..signals.len() - 1];
    applied.iter().filter(|s| **s != 0.0).count() as f64 / applied.len() as f64
}

//performance of a signal series over a close series, every number finite
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub equity_curve: Vec<f64>,
}

//returns, equity, sharpe and drawdown for aligned closes and signals
//total return and drawdown are read off the same finite curve that is reported
pub fn evaluate(closes: &[f64], signals: &[f64]) -> PerformanceReport {
    let returns = strategy_returns(closes, signals);
    let equity = equity_curve(&returns);

    let observed: Vec<f64> = returns
        .iter()
        .flatten()
        .copied()
        .filter(|r| r.is_finite())
        .collect();

    let total_return = equity.last().map(|e| e - 1.0).unwrap_or(0.0);

    PerformanceReport {
        total_return: sanitize(total_return),
        sharpe_ratio: sharpe_ratio(&observed),
        max_drawdown: max_drawdown(&equity),
        equity_curve: equity,
    }
}
