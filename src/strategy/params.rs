use crate::error::StrategyError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

//strategy parameters keyed by name
//unknown keys are ignored by every strategy, missing keys fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyParameters(IndexMap<String, f64>);

impl StrategyParameters {
    pub fn new() -> Self {
        StrategyParameters(IndexMap::new())
    }

    //builder style insert
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    //finite number or the default
    pub fn number(&self, key: &str, default: f64) -> Result<f64, StrategyError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(StrategyError::invalid(key, v, "must be a finite number")),
        }
    }

    //positive whole number or the default, used for windows and periods
    pub fn window(&self, key: &str, default: usize) -> Result<usize, StrategyError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) if v.is_finite() && v >= 1.0 && v.fract() == 0.0 => Ok(v as usize),
            Some(v) => Err(StrategyError::invalid(
                key,
                v,
                "must be a positive whole number",
            )),
        }
    }
}

impl FromIterator<(String, f64)> for StrategyParameters {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        StrategyParameters(iter.into_iter().collect())
    }
}
