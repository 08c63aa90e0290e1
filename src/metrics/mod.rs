pub mod performance;
pub mod summary;

pub use performance::{
    equity_curve, max_drawdown, period_returns, sanitize, sharpe_ratio, strategy_returns,
};
pub use summary::SummaryMetrics;
