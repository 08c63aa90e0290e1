use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a bar record as delivered by the market data source
//timestamp is epoch milliseconds, close may be missing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawBar {
    pub timestamp: i64,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub vwap: Option<f64>,
    #[serde(default)]
    pub transactions: Option<u64>,
}

impl RawBar {
    //bar with every price set to close, used by fixtures and simple feeds
    pub fn from_close(timestamp: i64, close: f64) -> Self {
        RawBar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close: Some(close),
            volume: 0.0,
            vwap: None,
            transactions: None,
        }
    }
}

//represents a single validated ohlcv bar (candlestick)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub vwap: Option<f64>,
    pub transaction_count: Option<u64>,
}
