use crate::error::BacktestError;
use crate::strategy::ema_crossover::EmaCrossoverStrategy;
use crate::strategy::momentum_regression::MomentumRegressionStrategy;
use crate::strategy::rsi_reversion::RsiReversionStrategy;
use crate::strategy::sma_crossover::SmaCrossoverStrategy;
use crate::strategy::{FailurePolicy, Strategy};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::debug;

pub const SIMPLE_MOVING_AVERAGE: &str = "simple_moving_average";
pub const EXPONENTIAL_MOVING_AVERAGE: &str = "exponential_moving_average";
pub const RSI_STRATEGY: &str = "rsi_strategy";
pub const MOMENTUM_REGRESSION: &str = "momentum_regression";

//a registered strategy
pub struct StrategyEntry {
    pub id: String,
    pub display_name: String,
    pub strategy: Box<dyn Strategy>,
}

impl StrategyEntry {
    pub fn failure_policy(&self) -> FailurePolicy {
        self.strategy.failure_policy()
    }
}

impl fmt::Debug for StrategyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyEntry")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("failure_policy", &self.failure_policy())
            .finish()
    }
}

//catalog row for presentation layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyInfo {
    pub id: String,
    pub display_name: String,
    pub failure_policy: FailurePolicy,
}

//strategy catalog in registration order
//built once at startup then shared read-only, so concurrent lookups need no locking
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    entries: IndexMap<String, StrategyEntry>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        StrategyRegistry {
            entries: IndexMap::new(),
        }
    }

    //registry with the four built in strategies
    //simple_moving_average, exponential_moving_average and rsi_strategy report
    //failures to the caller, momentum_regression falls back to a flat series
    pub fn with_defaults() -> Self {
        let registry = StrategyRegistry::new()
            .register(
                SIMPLE_MOVING_AVERAGE,
                "Simple Moving Average",
                Box::new(SmaCrossoverStrategy),
            )
            .register(
                EXPONENTIAL_MOVING_AVERAGE,
                "Exponential Moving Average",
                Box::new(EmaCrossoverStrategy),
            )
            .register(
                RSI_STRATEGY,
                "Relative Strength Index",
                Box::new(RsiReversionStrategy),
            )
            .register(
                MOMENTUM_REGRESSION,
                "Momentum Regression",
                Box::new(MomentumRegressionStrategy),
            );

        debug!(strategies = registry.len(), "strategy registry built");
        registry
    }

    //adds a strategy, replacing any entry already under the same id in place
    pub fn register(
        mut self,
        id: &str,
        display_name: &str,
        strategy: Box<dyn Strategy>,
    ) -> Self {
        self.entries.insert(
            id.to_string(),
            StrategyEntry {
                id: id.to_string(),
                display_name: display_name.to_string(),
                strategy,
            },
        );
        self
    }

    pub fn get(&self, id: &str) -> Result<&StrategyEntry, BacktestError> {
        self.entries
            .get(id)
            .ok_or_else(|| BacktestError::UnknownStrategy(id.to_string()))
    }

    pub fn list(&self) -> Vec<StrategyInfo> {
        self.entries
            .values()
            .map(|entry| StrategyInfo {
                id: entry.id.clone(),
                display_name: entry.display_name.clone(),
                failure_policy: entry.failure_policy(),
            })
            .collect()
    }

    //id to display name, in registration order
    pub fn display_names(&self) -> IndexMap<String, String> {
        self.entries
            .values()
            .map(|entry| (entry.id.clone(), entry.display_name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceSeries;
    use crate::error::StrategyError;
    use crate::strategy::StrategyParameters;

    struct AlwaysLong;

    impl Strategy for AlwaysLong {
        fn evaluate(
            &self,
            series: &PriceSeries,
            _params: &StrategyParameters,
        ) -> Result<Vec<f64>, StrategyError> {
            Ok(vec![1.0; series.len()])
        }
    }

    #[test]
    fn defaults_are_listed_in_order() {
        let registry = StrategyRegistry::with_defaults();
        let ids: Vec<String> = registry.list().into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SIMPLE_MOVING_AVERAGE,
                EXPONENTIAL_MOVING_AVERAGE,
                RSI_STRATEGY,
                MOMENTUM_REGRESSION
            ]
        );
    }

    #[test]
    fn failure_policies_are_documented_per_entry() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(
            registry.get(SIMPLE_MOVING_AVERAGE).unwrap().failure_policy(),
            FailurePolicy::Propagate
        );
        assert_eq!(
            registry.get(RSI_STRATEGY).unwrap().failure_policy(),
            FailurePolicy::Propagate
        );
        assert_eq!(
            registry.get(MOMENTUM_REGRESSION).unwrap().failure_policy(),
            FailurePolicy::Neutral
        );
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(
            registry.get("not_a_strategy").unwrap_err(),
            BacktestError::UnknownStrategy("not_a_strategy".to_string())
        );
    }

    #[test]
    fn custom_registration_and_replacement() {
        let registry = StrategyRegistry::new()
            .register("long", "Always Long", Box::new(AlwaysLong))
            .register("long", "Buy And Hold", Box::new(AlwaysLong));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.display_names()["long"], "Buy And Hold");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<StrategyRegistry>();
    }
}
