use crate::data::bar::{PriceBar, RawBar};
use crate::error::DataError;
use chrono::{DateTime, Utc};

//canonical time-indexed price series
//invariant: non-empty, timestamps strictly ascending, every close finite
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    //normalizes raw provider bars into a price series
    //sorts by timestamp, rejects empty input, missing or non-finite closes and duplicates
    pub fn from_raw(raw: &[RawBar]) -> Result<Self, DataError> {
        if raw.is_empty() {
            return Err(DataError::EmptySeries);
        }

        let mut bars = Vec::with_capacity(raw.len());
        for (index, record) in raw.iter().enumerate() {
            let close = match record.close {
                Some(v) if v.is_finite() => v,
                Some(v) => return Err(DataError::NonFiniteClose { index, value: v }),
                None => return Err(DataError::MissingClose { index }),
            };

            let timestamp = DateTime::<Utc>::from_timestamp_millis(record.timestamp).ok_or(
                DataError::InvalidTimestamp {
                    index,
                    millis: record.timestamp,
                },
            )?;

            bars.push(PriceBar {
                timestamp,
                open: record.open,
                high: record.high,
                low: record.low,
                close,
                volume: record.volume,
                vwap: record.vwap,
                transaction_count: record.transactions,
            });
        }

        Self::from_bars(bars)
    }

    //builds a series from already typed bars, applying the same ordering rules
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries);
        }

        if let Some((index, bar)) = bars
            .iter()
            .enumerate()
            .find(|(_, b)| !b.close.is_finite())
        {
            return Err(DataError::NonFiniteClose {
                index,
                value: bar.close,
            });
        }

        //sort only when the feed arrived out of order
        if !bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
            bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }

        if let Some(pair) = bars.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(DataError::DuplicateTimestamp {
                timestamp: pair[0].timestamp,
            });
        }

        Ok(PriceSeries { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    //never true for a series built through from_raw or from_bars
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }
}
