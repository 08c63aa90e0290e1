use crate::data::bar::RawBar;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

//loads raw bars from a csv file with provider column names
//columns: timestamp (epoch ms), open, high, low, close, volume, vwap, transactions
//an empty close cell is kept as a missing close so validation can reject it
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawBar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: RawBar =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;
        bars.push(record);
    }

    debug!(path = ?path, bars = bars.len(), "loaded csv bars");
    Ok(bars)
}

//loads raw bars from a json array of provider aggregates
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<RawBar>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read JSON file: {:?}", path))?;
    let bars: Vec<RawBar> = serde_json::from_str(&contents)
        .context(format!("Failed to parse JSON bars in {:?}", path))?;

    debug!(path = ?path, bars = bars.len(), "loaded json bars");
    Ok(bars)
}

//picks the loader from the file extension, csv unless it ends in .json
pub fn load_bars<P: AsRef<Path>>(path: P) -> Result<Vec<RawBar>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        load_json(path)
    } else {
        load_csv(path)
    }
}
