use crate::data::PriceSeries;
use crate::error::StrategyError;
use crate::indicators::sma;
use crate::regression::{walk_forward_weights, RegressionFrame, WalkForwardConfig};
use crate::strategy::{FailurePolicy, Strategy, StrategyParameters};

//momentum regression strategy
//regresses the next bar's return on short, mid and long smas over a trailing
//window and sizes the position by the fitted intercept over residual variance
//signals are continuous weights in [-max_weight, max_weight]
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumRegressionStrategy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumParams {
    pub short_sma: usize,
    pub mid_sma: usize,
    pub long_sma: usize,
    pub regression: WalkForwardConfig,
}

impl Default for MomentumParams {
    fn default() -> Self {
        MomentumParams {
            short_sma: 5,
            mid_sma: 20,
            long_sma: 60,
            regression: WalkForwardConfig::default(),
        }
    }
}

impl MomentumParams {
    //keys: short_sma, mid_sma, long_sma, regression_window, epsilon, max_weight
    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, StrategyError> {
        let defaults = MomentumParams::default();

        let window = params.window("regression_window", defaults.regression.window)?;
        if window < 2 {
            return Err(StrategyError::invalid(
                "regression_window",
                window as f64,
                "must be at least 2",
            ));
        }

        let epsilon = params.number("epsilon", defaults.regression.epsilon)?;
        if epsilon < 0.0 {
            return Err(StrategyError::invalid("epsilon", epsilon, "must not be negative"));
        }

        let max_weight = params.number("max_weight", defaults.regression.max_weight)?;
        if max_weight <= 0.0 {
            return Err(StrategyError::invalid("max_weight", max_weight, "must be positive"));
        }

        Ok(MomentumParams {
            short_sma: params.window("short_sma", defaults.short_sma)?,
            mid_sma: params.window("mid_sma", defaults.mid_sma)?,
            long_sma: params.window("long_sma", defaults.long_sma)?,
            regression: WalkForwardConfig {
                window,
                epsilon,
                max_weight,
            },
        })
    }
}

//one-period forward return per bar, the last bar has none
pub fn forward_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns: Vec<Option<f64>> = closes
        .windows(2)
        .map(|w| Some(w[1] / w[0] - 1.0).filter(|r| r.is_finite()))
        .collect();
    if !closes.is_empty() {
        returns.push(None);
    }
    returns
}

//sma predictor columns and forward return response
pub fn regression_frame(closes: &[f64], params: &MomentumParams) -> RegressionFrame {
    RegressionFrame {
        predictors: vec![
            sma(closes, params.short_sma),
            sma(closes, params.mid_sma),
            sma(closes, params.long_sma),
        ],
        response: forward_returns(closes),
    }
}

impl Strategy for MomentumRegressionStrategy {
    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParameters,
    ) -> Result<Vec<f64>, StrategyError> {
        let params = MomentumParams::from_parameters(params)?;
        let frame = regression_frame(&series.closes(), &params);
        Ok(walk_forward_weights(&frame, &params.regression))
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Neutral
    }
}
