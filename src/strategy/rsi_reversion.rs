use crate::data::PriceSeries;
use crate::error::StrategyError;
use crate::indicators::rsi;
use crate::strategy::{threshold_signals, Strategy, StrategyParameters};

//rsi mean reversion strategy
//long when rsi drops below the oversold threshold
//short when rsi rises above the overbought threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct RsiReversionStrategy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl RsiParams {
    //keys: period, oversold, overbought
    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, StrategyError> {
        let defaults = RsiParams::default();
        let oversold = params.number("oversold", defaults.oversold)?;
        let overbought = params.number("overbought", defaults.overbought)?;
        if oversold >= overbought {
            return Err(StrategyError::invalid(
                "oversold",
                oversold,
                format!("must be below overbought ({})", overbought),
            ));
        }

        Ok(RsiParams {
            period: params.window("period", defaults.period)?,
            oversold,
            overbought,
        })
    }
}

impl Strategy for RsiReversionStrategy {
    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParameters,
    ) -> Result<Vec<f64>, StrategyError> {
        let params = RsiParams::from_parameters(params)?;
        let values = rsi(&series.closes(), params.period);
        Ok(threshold_signals(&values, params.oversold, params.overbought))
    }
}
