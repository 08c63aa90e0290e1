pub mod moving_average;
pub mod rsi;

pub use moving_average::{ema, ema_alpha, sma};
pub use rsi::rsi;
