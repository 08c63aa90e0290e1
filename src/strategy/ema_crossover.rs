use crate::data::PriceSeries;
use crate::error::StrategyError;
use crate::indicators::ema;
use crate::strategy::{crossover_signals, Strategy, StrategyParameters};

//ema crossover strategy, the faster reacting sibling of the sma crossover
//both emas are defined from the first bar so there is no warmup region
#[derive(Debug, Clone, Copy, Default)]
pub struct EmaCrossoverStrategy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaParams {
    pub short_window: usize,
    pub long_window: usize,
    pub smoothing: f64,
}

impl Default for EmaParams {
    fn default() -> Self {
        EmaParams {
            short_window: 8,
            long_window: 20,
            smoothing: 2.0,
        }
    }
}

impl EmaParams {
    //keys: short_window, long_window, smoothing
    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, StrategyError> {
        let defaults = EmaParams::default();
        let smoothing = params.number("smoothing", defaults.smoothing)?;
        if smoothing <= 0.0 {
            return Err(StrategyError::invalid("smoothing", smoothing, "must be positive"));
        }

        Ok(EmaParams {
            short_window: params.window("short_window", defaults.short_window)?,
            long_window: params.window("long_window", defaults.long_window)?,
            smoothing,
        })
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParameters,
    ) -> Result<Vec<f64>, StrategyError> {
        let params = EmaParams::from_parameters(params)?;
        let closes = series.closes();

        let fast: Vec<Option<f64>> = ema(&closes, params.short_window, params.smoothing)
            .into_iter()
            .map(Some)
            .collect();
        let slow: Vec<Option<f64>> = ema(&closes, params.long_window, params.smoothing)
            .into_iter()
            .map(Some)
            .collect();

        Ok(crossover_signals(&fast, &slow))
    }
}
