pub mod bar;
pub mod loader;
pub mod series;

pub use bar::{PriceBar, RawBar};
pub use loader::{load_bars, load_csv, load_json};
pub use series::PriceSeries;
