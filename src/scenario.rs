//! Scenario runner for comparing under every named rate scenario
//!
//! Each scenario comparison is independent, so they run in parallel.

use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::comparison::{compare_with_scenario, ComparisonResult};
use crate::error::Result;
use crate::input::ScenarioInput;

/// Runs one scenario input under several rate scenarios
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(input);
/// for (name, result) in runner.run_all()? {
///     println!("{}: {}", name, result.summary.recommendation);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    input: ScenarioInput,
}

impl ScenarioRunner {
    pub fn new(input: ScenarioInput) -> Self {
        Self { input }
    }

    /// Names of all rate scenarios, sorted
    pub fn scenario_names(&self) -> Vec<&str> {
        self.input.rate_scenarios.keys().map(String::as_str).collect()
    }

    /// Compare under a single named scenario
    pub fn run(&self, scenario: &str) -> Result<ComparisonResult> {
        compare_with_scenario(&self.input, scenario)
    }

    /// Compare under every named scenario
    pub fn run_all(&self) -> Result<BTreeMap<String, ComparisonResult>> {
        self.run_scenarios(&self.scenario_names())
    }

    /// Compare under the given scenarios; fails on the first unknown name
    pub fn run_scenarios(&self, names: &[&str]) -> Result<BTreeMap<String, ComparisonResult>> {
        let results: Vec<(String, Result<ComparisonResult>)> = names
            .par_iter()
            .map(|name| (name.to_string(), self.run(name)))
            .collect();

        results
            .into_iter()
            .map(|(name, result)| result.map(|r| (name, r)))
            .collect()
    }
}
