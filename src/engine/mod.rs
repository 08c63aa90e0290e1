pub mod backtest;

pub use backtest::{BacktestEngine, BacktestResult};
