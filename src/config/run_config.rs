use crate::strategy::registry::SIMPLE_MOVING_AVERAGE;
use crate::strategy::StrategyParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete run configuration, loadable from a json file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    //data
    pub data_path: PathBuf,
    #[serde(default)]
    pub symbol: Option<String>,

    //strategy
    pub strategy: String,
    #[serde(default)]
    pub parameters: StrategyParameters,

    //optional output paths
    #[serde(default)]
    pub output_equity_csv: Option<PathBuf>,
    #[serde(default)]
    pub output_json: Option<PathBuf>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunConfiguration {
            data_path: PathBuf::from("data.csv"),
            symbol: None,
            strategy: SIMPLE_MOVING_AVERAGE.to_string(),
            parameters: StrategyParameters::new(),
            output_equity_csv: None,
            output_json: None,
        }
    }
}

impl RunConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //parses key=value overrides into the parameter map
    pub fn apply_overrides(&mut self, overrides: &[String]) -> anyhow::Result<()> {
        for item in overrides {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("parameter '{}' is not key=value", item))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("parameter '{}' has a non-numeric value", item))?;
            self.parameters.insert(key.trim(), value);
        }
        Ok(())
    }
}
