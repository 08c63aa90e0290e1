pub mod ema_crossover;
pub mod momentum_regression;
pub mod params;
pub mod registry;
pub mod rsi_reversion;
pub mod sma_crossover;

use crate::data::PriceSeries;
use crate::error::StrategyError;
use serde::{Deserialize, Serialize};

pub use params::StrategyParameters;
pub use registry::{StrategyEntry, StrategyRegistry};

//what the orchestrator does when a strategy evaluator fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    //report the failure to the caller as a strategy execution error
    Propagate,
    //continue with an all-zero signal series
    Neutral,
}

//strategy interface that all strategies must implement
//evaluate returns one signal per bar of the series
pub trait Strategy: Send + Sync {
    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParameters,
    ) -> Result<Vec<f64>, StrategyError>;

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Propagate
    }
}

//1 where fast is above slow, -1 where below, 0 when equal or either is missing
pub fn crossover_signals(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<f64> {
    fast.iter()
        .zip(slow.iter())
        .map(|pair| match pair {
            (Some(f), Some(s)) if f > s => 1.0,
            (Some(f), Some(s)) if f < s => -1.0,
            _ => 0.0,
        })
        .collect()
}

//mean reversion thresholds: long below the lower band, short above the upper band
pub fn threshold_signals(values: &[Option<f64>], lower: f64, upper: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| match v {
            Some(x) if *x < lower => 1.0,
            Some(x) if *x > upper => -1.0,
            _ => 0.0,
        })
        .collect()
}
