//! Monthly index curves grouped into named scenarios

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annual index values, one per month
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCurve {
    values: Vec<f64>,
}

impl RateCurve {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Index value for a 1-indexed month
    ///
    /// Months past the end repeat the last value; an empty curve is 0.0.
    pub fn value_at(&self, month: u32) -> f64 {
        let idx = (month as usize).saturating_sub(1);
        self.values
            .get(idx)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for RateCurve {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Set of index curves keyed by index type (e.g. "EIBOR_1M")
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateScenario {
    curves: BTreeMap<String, RateCurve>,
}

impl RateScenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_curve(mut self, index_type: &str, curve: impl Into<RateCurve>) -> Self {
        self.insert(index_type, curve);
        self
    }

    pub fn insert(&mut self, index_type: &str, curve: impl Into<RateCurve>) {
        self.curves.insert(index_type.to_string(), curve.into());
    }

    pub fn curve(&self, index_type: &str) -> Option<&RateCurve> {
        self.curves.get(index_type)
    }

    /// Index value for a month; an index with no curve reads as 0.0
    pub fn index_value(&self, index_type: &str, month: u32) -> f64 {
        self.curve(index_type)
            .map(|c| c.value_at(month))
            .unwrap_or(0.0)
    }

    pub fn index_types(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_lookup_is_one_indexed() {
        let curve = RateCurve::new(vec![0.050, 0.051, 0.052]);
        assert_eq!(curve.value_at(1), 0.050);
        assert_eq!(curve.value_at(3), 0.052);
    }

    #[test]
    fn test_curve_flat_extrapolation() {
        let curve = RateCurve::new(vec![0.050, 0.051, 0.052]);
        assert_eq!(curve.value_at(4), 0.052);
        assert_eq!(curve.value_at(360), 0.052);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        assert!(RateCurve::default().is_empty());
        assert_eq!(RateCurve::default().value_at(1), 0.0);
        assert_eq!(RateCurve::default().value_at(100), 0.0);
    }

    #[test]
    fn test_missing_index_is_zero() {
        let scenario = RateScenario::new().with_curve("EIBOR_1M", vec![0.045]);
        assert_eq!(scenario.index_value("EIBOR_1M", 12), 0.045);
        assert_eq!(scenario.index_value("EIBOR_6M", 12), 0.0);
    }

    #[test]
    fn test_scenario_deserializes_from_map() {
        let scenario: RateScenario =
            serde_json::from_str(r#"{"EIBOR_1M": [0.05, 0.051], "EIBOR_3M": []}"#).unwrap();
        assert_eq!(scenario.index_value("EIBOR_1M", 2), 0.051);
        assert_eq!(scenario.index_value("EIBOR_3M", 2), 0.0);
        assert_eq!(scenario.index_types().count(), 2);
    }
}
