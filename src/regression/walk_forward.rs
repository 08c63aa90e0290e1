use crate::regression::ols::{fit_with_intercept, OlsFit};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, warn};

//settings for the sliding window fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkForwardConfig {
    //number of trailing rows in every fit
    pub window: usize,
    //floor added to the residual variance before dividing
    pub epsilon: f64,
    //weights are clamped to [-max_weight, max_weight]
    pub max_weight: f64,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        WalkForwardConfig {
            window: 30,
            epsilon: 1e-6,
            max_weight: 1.0,
        }
    }
}

//aligned regression inputs
//predictors are columns of the same length as response, none marks a missing value
#[derive(Debug, Clone)]
pub struct RegressionFrame {
    pub predictors: Vec<Vec<Option<f64>>>,
    pub response: Vec<Option<f64>>,
}

impl RegressionFrame {
    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    //row t when every predictor and the response are present and finite
    fn row(&self, t: usize) -> Option<(Vec<f64>, f64)> {
        let y = self.response.get(t).copied().flatten().filter(|v| v.is_finite())?;
        let xs = self
            .predictors
            .iter()
            .map(|col| col.get(t).copied().flatten().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()?;
        Some((xs, y))
    }
}

//outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepWeight {
    //not enough history before this step
    Warmup,
    //fewer than half the window rows were usable
    Sparse,
    //the regression could not be estimated, weight 0
    FailedClosed,
    Weight(f64),
}

impl StepWeight {
    pub fn value(&self) -> f64 {
        match self {
            StepWeight::Weight(w) => *w,
            _ => 0.0,
        }
    }
}

//fits the ols model on rows [step - window, step) of the frame
//the last row's response is realized at bar `step`, so nothing later is used
pub fn fit_step(frame: &RegressionFrame, step: usize, window: usize) -> Result<OlsFit, StepWeight> {
    if window == 0 || step < window || step > frame.len() {
        return Err(StepWeight::Warmup);
    }

    let rows: Vec<(Vec<f64>, f64)> = (step - window..step).filter_map(|t| frame.row(t)).collect();
    if rows.len() * 2 < window {
        return Err(StepWeight::Sparse);
    }

    let p = frame.predictors.len();
    let flat: Vec<f64> = rows.iter().flat_map(|(xs, _)| xs.iter().copied()).collect();
    let x = Array2::from_shape_vec((rows.len(), p), flat).map_err(|_| StepWeight::FailedClosed)?;
    let y = Array1::from_iter(rows.iter().map(|(_, y)| *y));

    fit_with_intercept(x.view(), y.view()).ok_or(StepWeight::FailedClosed)
}

//position weight from a fit: clamp(alpha / (sigma^2 + epsilon))
pub fn gamma(fit: &OlsFit, config: &WalkForwardConfig) -> StepWeight {
    let raw = fit.intercept() / (fit.residual_variance + config.epsilon);
    if raw.is_nan() {
        return StepWeight::FailedClosed;
    }
    StepWeight::Weight(raw.clamp(-config.max_weight, config.max_weight))
}

pub fn step_weight(frame: &RegressionFrame, step: usize, config: &WalkForwardConfig) -> StepWeight {
    match fit_step(frame, step, config.window) {
        Ok(fit) => gamma(&fit, config),
        Err(outcome) => outcome,
    }
}

//walk-forward weights for every position of the frame
//steps are fitted independently in parallel and collected in order
pub fn walk_forward_weights(frame: &RegressionFrame, config: &WalkForwardConfig) -> Vec<f64> {
    let outcomes: Vec<StepWeight> = (0..frame.len())
        .into_par_iter()
        .map(|step| step_weight(frame, step, config))
        .collect();

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, StepWeight::FailedClosed))
        .count();
    let sparse = outcomes
        .iter()
        .filter(|o| matches!(o, StepWeight::Sparse))
        .count();

    if failed > 0 {
        warn!(failed, steps = outcomes.len(), "regression steps failed closed");
    }
    debug!(
        steps = outcomes.len(),
        sparse,
        window = config.window,
        "walk-forward regression complete"
    );

    outcomes.iter().map(StepWeight::value).collect()
}
