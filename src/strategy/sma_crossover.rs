use crate::data::PriceSeries;
use crate::error::StrategyError;
use crate::indicators::sma;
use crate::strategy::{crossover_signals, Strategy, StrategyParameters};

//sma crossover strategy
//long while the short sma is above the long sma, short while it is below
//positions where either sma is still warming up carry no signal
#[derive(Debug, Clone, Copy, Default)]
pub struct SmaCrossoverStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        SmaParams {
            short_window: 20,
            long_window: 50,
        }
    }
}

impl SmaParams {
    //keys: short_window, long_window
    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, StrategyError> {
        let defaults = SmaParams::default();
        Ok(SmaParams {
            short_window: params.window("short_window", defaults.short_window)?,
            long_window: params.window("long_window", defaults.long_window)?,
        })
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParameters,
    ) -> Result<Vec<f64>, StrategyError> {
        let params = SmaParams::from_parameters(params)?;
        let closes = series.closes();

        let fast = sma(&closes, params.short_window);
        let slow = sma(&closes, params.long_window);

        Ok(crossover_signals(&fast, &slow))
    }
}
