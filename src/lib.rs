//a Rust-based signal strategy backtesting engine

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod regression;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::RunConfiguration;
    pub use crate::data::{load_bars, load_csv, load_json, PriceBar, PriceSeries, RawBar};
    pub use crate::engine::{BacktestEngine, BacktestResult};
    pub use crate::error::{BacktestError, DataError, StrategyError};
    pub use crate::metrics::SummaryMetrics;
    pub use crate::regression::{OlsFit, WalkForwardConfig};
    pub use crate::strategy::{
        ema_crossover::EmaCrossoverStrategy, momentum_regression::MomentumRegressionStrategy,
        rsi_reversion::RsiReversionStrategy, sma_crossover::SmaCrossoverStrategy, FailurePolicy,
        Strategy, StrategyParameters, StrategyRegistry,
    };
}
