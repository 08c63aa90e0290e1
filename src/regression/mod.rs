pub mod ols;
pub mod walk_forward;

pub use ols::{fit, fit_with_intercept, OlsFit};
pub use walk_forward::{
    fit_step, walk_forward_weights, RegressionFrame, StepWeight, WalkForwardConfig,
};
