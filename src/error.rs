use chrono::{DateTime, Utc};
use thiserror::Error;

//input series validation failures
//not retryable, the caller must fix the input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("price series is empty")]
    EmptySeries,
    #[error("bar {index} has no close price")]
    MissingClose { index: usize },
    #[error("bar {index} has a non-finite close price ({value})")]
    NonFiniteClose { index: usize, value: f64 },
    #[error("bar {index} has an out of range timestamp ({millis} ms)")]
    InvalidTimestamp { index: usize, millis: i64 },
    #[error("duplicate timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: DateTime<Utc> },
}

//failures raised inside a strategy evaluator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },
    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl StrategyError {
    pub fn invalid(name: &str, value: f64, reason: impl Into<String>) -> Self {
        StrategyError::InvalidParameter {
            name: name.to_string(),
            value,
            reason: reason.into(),
        }
    }
}

//errors surfaced by the backtest entrypoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("invalid data: {0}")]
    InvalidData(#[from] DataError),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("strategy {strategy_id} failed: {source}")]
    StrategyExecution {
        strategy_id: String,
        #[source]
        source: StrategyError,
    },
}
