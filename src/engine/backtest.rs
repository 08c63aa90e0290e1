use crate::data::{PriceSeries, RawBar};
use crate::error::{BacktestError, StrategyError};
use crate::metrics::performance::{evaluate, sanitize_all};
use crate::strategy::{FailurePolicy, StrategyEntry, StrategyParameters, StrategyRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

//result of a backtest, every number is finite
//signals and equity_curve hold one value per bar of the input series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy_id: String,
    pub display_name: String,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub signals: Vec<f64>,
    pub equity_curve: Vec<f64>,
    //true when the strategy failed and a flat series was evaluated instead
    #[serde(default)]
    pub degraded: bool,
}

//main backtest engine
//holds the strategy catalog and nothing else, so one engine can serve
//any number of concurrent runs
#[derive(Debug)]
pub struct BacktestEngine {
    registry: StrategyRegistry,
}

impl Default for BacktestEngine {
    fn default() -> Self {
        BacktestEngine::new(StrategyRegistry::with_defaults())
    }
}

impl BacktestEngine {
    pub fn new(registry: StrategyRegistry) -> Self {
        BacktestEngine { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    //strategy id to display name
    pub fn get_all_strategies(&self) -> IndexMap<String, String> {
        self.registry.display_names()
    }

    //runs a strategy over raw provider bars
    //validate -> select strategy -> signals -> performance -> sanitize
    pub fn run_backtest(
        &self,
        bars: &[RawBar],
        strategy_id: &str,
        params: &StrategyParameters,
    ) -> Result<BacktestResult, BacktestError> {
        let series = PriceSeries::from_raw(bars)?;
        self.run_series(&series, strategy_id, params)
    }

    //same as run_backtest for an already validated series
    pub fn run_series(
        &self,
        series: &PriceSeries,
        strategy_id: &str,
        params: &StrategyParameters,
    ) -> Result<BacktestResult, BacktestError> {
        let entry = self.registry.get(strategy_id)?;

        let (signals, degraded) = match evaluate_signals(entry, series, params) {
            Ok(signals) => (signals, false),
            Err(source) => match entry.failure_policy() {
                FailurePolicy::Propagate => {
                    return Err(BacktestError::StrategyExecution {
                        strategy_id: entry.id.clone(),
                        source,
                    })
                }
                FailurePolicy::Neutral => {
                    warn!(
                        strategy = %entry.id,
                        error = %source,
                        "strategy failed, evaluating a flat signal series"
                    );
                    (vec![0.0; series.len()], true)
                }
            },
        };

        let report = evaluate(&series.closes(), &signals);

        info!(
            strategy = %entry.id,
            bars = series.len(),
            total_return = report.total_return,
            sharpe = report.sharpe_ratio,
            max_drawdown = report.max_drawdown,
            degraded,
            "backtest complete"
        );

        Ok(BacktestResult {
            strategy_id: entry.id.clone(),
            display_name: entry.display_name.clone(),
            total_return: report.total_return,
            sharpe_ratio: report.sharpe_ratio,
            max_drawdown: report.max_drawdown,
            signals,
            equity_curve: report.equity_curve,
            degraded,
        })
    }
}

//runs the evaluator and checks the shape of what it returned
fn evaluate_signals(
    entry: &StrategyEntry,
    series: &PriceSeries,
    params: &StrategyParameters,
) -> Result<Vec<f64>, StrategyError> {
    let signals = entry.strategy.evaluate(series, params)?;
    if signals.len() != series.len() {
        return Err(StrategyError::Numerical(format!(
            "strategy returned {} signals for {} bars",
            signals.len(),
            series.len()
        )));
    }
    Ok(sanitize_all(&signals))
}
