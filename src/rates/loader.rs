//! CSV-based rate curve loader
//!
//! Expects a `month` column followed by one column per index type:
//!
//! ```text
//! month,EIBOR_1M,EIBOR_3M
//! 1,0.0520,0.0535
//! 2,0.0518,0.0533
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::curve::RateScenario;
use crate::error::{EngineError, Result};

/// Load a curve set from a CSV file
pub fn load_curves(path: &Path) -> Result<RateScenario> {
    let file = File::open(path)?;
    load_curves_from_reader(file)
}

/// Load a curve set from any CSV reader
pub fn load_curves_from_reader<R: Read>(reader: R) -> Result<RateScenario> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.get(0).map(str::trim) != Some("month") {
        return Err(EngineError::invalid("curves", "first column must be `month`"));
    }
    let index_types: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut rows: Vec<(u32, Vec<f64>)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let month: u32 = record[0]
            .trim()
            .parse()
            .map_err(|_| EngineError::invalid("curves.month", format!("not a month: {}", &record[0])))?;
        if month == 0 {
            return Err(EngineError::invalid("curves.month", "months are 1-indexed"));
        }

        let mut values = Vec::with_capacity(index_types.len());
        for (col, index_type) in index_types.iter().enumerate() {
            let raw = record.get(col + 1).unwrap_or("").trim();
            let value: f64 = raw.parse().map_err(|_| {
                EngineError::invalid(
                    format!("curves.{}", index_type),
                    format!("month {}: not a rate: {:?}", month, raw),
                )
            })?;
            values.push(value);
        }
        rows.push((month, values));
    }

    rows.sort_by_key(|(month, _)| *month);
    for (expected, (month, _)) in (1u32..).zip(&rows) {
        if *month != expected {
            return Err(EngineError::invalid(
                "curves.month",
                format!("expected month {}, found {}", expected, month),
            ));
        }
    }

    let mut scenario = RateScenario::new();
    for (col, index_type) in index_types.iter().enumerate() {
        let values: Vec<f64> = rows.iter().map(|(_, v)| v[col]).collect();
        scenario.insert(index_type, values);
    }

    log::debug!(
        "Loaded {} curves over {} months",
        index_types.len(),
        rows.len()
    );

    Ok(scenario)
}
