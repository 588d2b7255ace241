//! Stay-versus-switch comparison
//!
//! Runs the amortization engine once per option over the same principal,
//! tenure, horizon and prepayment plan, then aggregates cumulative cash out
//! to find the break-even month and the recommendation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::input::{Fee, LoanOption, OptionKind, ScenarioInput, BASE_SCENARIO};
use crate::projection::{
    round2, AmortizationEngine, MonthlyRecord, OptionProjection, OptionSummary, SimulationConfig,
};
use crate::rates::RateResolver;

/// A value held once per option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerOption<T> {
    pub stay: T,
    pub switch: T,
}

impl<T> PerOption<T> {
    pub fn get(&self, option: OptionKind) -> &T {
        match option {
            OptionKind::Stay => &self.stay,
            OptionKind::Switch => &self.switch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub stay_total_cash_out_aed: f64,
    pub switch_total_cash_out_aed: f64,
    /// Stay total minus switch total; positive when switching is cheaper
    pub savings_aed: f64,
    /// First month where cumulative switch cost no longer exceeds stay
    pub break_even_month: Option<u32>,
    pub recommendation: OptionKind,
    /// Rate scenario the comparison ran under
    pub scenario: String,
    pub assumptions_note: String,
}

/// Full comparison output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub summary: ComparisonSummary,
    /// Stay records followed by switch records
    pub monthly_cashflows: Vec<MonthlyRecord>,
    pub fees_breakdown: PerOption<Vec<Fee>>,
    pub upfront_fees_applied: PerOption<f64>,
    /// Ledger totals per option
    pub option_totals: PerOption<OptionSummary>,
}

impl ComparisonResult {
    /// Ledger rows for one option, in month order
    pub fn cashflows_for(&self, option: OptionKind) -> impl Iterator<Item = &MonthlyRecord> {
        self.monthly_cashflows.iter().filter(move |r| r.option == option)
    }
}

/// Compare both options under the `base` rate scenario
pub fn compare(input: &ScenarioInput) -> Result<ComparisonResult> {
    compare_with_scenario(input, BASE_SCENARIO)
}

/// Compare both options under a named rate scenario
pub fn compare_with_scenario(input: &ScenarioInput, scenario: &str) -> Result<ComparisonResult> {
    let curves = input.scenario(scenario).ok_or_else(|| {
        if scenario == BASE_SCENARIO {
            EngineError::missing(format!("rate_scenarios.{}", BASE_SCENARIO))
        } else {
            EngineError::UnknownScenario(scenario.to_string())
        }
    })?;

    let config = SimulationConfig::from_input(input);
    let outside = input
        .prepayment_plan
        .iter()
        .filter(|e| e.month > config.last_month())
        .count();
    if outside > 0 {
        log::warn!(
            "{} prepayment(s) fall after month {} and are ignored",
            outside,
            config.last_month()
        );
    }

    let engine = AmortizationEngine::new(config);

    let stay_option = LoanOption::stay(input);
    let switch_option = LoanOption::switch(input);
    let stay_resolver = RateResolver::new(&stay_option.terms().rate_model, curves);
    let switch_resolver = RateResolver::new(&switch_option.terms().rate_model, curves);

    let stay = engine.simulate(stay_option, &stay_resolver, &input.prepayment_plan);
    let switch = engine.simulate(switch_option, &switch_resolver, &input.prepayment_plan);

    let break_even_month = find_break_even(&stay, &switch);
    let recommendation = if switch.total_cash_out < stay.total_cash_out {
        OptionKind::Switch
    } else {
        OptionKind::Stay
    };

    log::info!(
        "Scenario {}: stay {:.2} vs switch {:.2}, break-even {:?}, recommend {}",
        scenario,
        stay.total_cash_out,
        switch.total_cash_out,
        break_even_month,
        recommendation
    );

    let summary = ComparisonSummary {
        stay_total_cash_out_aed: stay.total_cash_out,
        switch_total_cash_out_aed: switch.total_cash_out,
        savings_aed: round2(stay.total_cash_out - switch.total_cash_out),
        break_even_month,
        recommendation,
        scenario: scenario.to_string(),
        assumptions_note: assumptions_note(input, scenario),
    };

    let upfront_fees_applied = PerOption {
        stay: stay.upfront_fees,
        switch: switch.upfront_fees,
    };

    let option_totals = PerOption {
        stay: stay.summary(),
        switch: switch.summary(),
    };

    let mut monthly_cashflows = stay.cashflows;
    monthly_cashflows.extend(switch.cashflows);

    Ok(ComparisonResult {
        summary,
        monthly_cashflows,
        fees_breakdown: PerOption {
            stay: stay.fees,
            switch: switch.fees,
        },
        upfront_fees_applied,
        option_totals,
    })
}

/// Running monthly cash out (payment, fees and insurance)
///
/// Upfront fees are not part of the running total; they only enter
/// `total_cash_out`.
pub fn cumulative_cash_out(projection: &OptionProjection) -> Vec<f64> {
    projection
        .cashflows
        .iter()
        .scan(0.0, |total, row| {
            *total += row.cash_out();
            Some(*total)
        })
        .collect()
}

/// First month at which cumulative switch cost is at or below stay
///
/// Only months present in both ledgers are compared.
pub fn find_break_even(stay: &OptionProjection, switch: &OptionProjection) -> Option<u32> {
    let stay_cum = cumulative_cash_out(stay);
    let switch_cum = cumulative_cash_out(switch);

    stay_cum
        .iter()
        .zip(&switch_cum)
        .zip(&switch.cashflows)
        .find(|((stay_total, switch_total), _)| switch_total <= stay_total)
        .map(|(_, row)| row.month)
}

fn assumptions_note(input: &ScenarioInput, scenario: &str) -> String {
    let fees = if input.assumptions.auto_estimate_buyout_fees {
        "automatic UAE buyout fee estimates applied"
    } else {
        "only itemized fees applied"
    };
    let mut note = format!("Rate scenario '{}' with {}.", scenario, fees);
    if input.current_terms.early_settlement.percent_of_outstanding > 0.0 {
        note.push_str(" Early settlement penalty from the current bank included.");
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::scenario_from_value;
    use serde_json::json;

    fn input() -> ScenarioInput {
        scenario_from_value(json!({
            "principal_aed": 1_000_000.0,
            "tenure_months": 300,
            "horizon_months": 60,
            "current_terms": {
                "bank": "Current Bank",
                "index_type": "EIBOR_1M",
                "margin_bps": 200,
                "floor_rate_annual": 0.0,
                "reset_freq_months": 1
            },
            "new_offer": {
                "bank": "New Bank",
                "fixed_rate_annual": 0.0399,
                "fixed_months": 36,
                "reversion_index_type": "EIBOR_3M",
                "reversion_margin_bps": 150
            },
            "rate_scenarios": {
                "base": { "EIBOR_1M": [0.052], "EIBOR_3M": [0.053] },
                "low": { "EIBOR_1M": [0.02], "EIBOR_3M": [0.021] }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_compare_produces_both_ledgers() {
        let result = compare(&input()).unwrap();

        assert_eq!(result.monthly_cashflows.len(), 120);
        assert_eq!(result.monthly_cashflows[0].option, OptionKind::Stay);
        assert_eq!(result.monthly_cashflows[60].option, OptionKind::Switch);
        assert_eq!(result.cashflows_for(OptionKind::Switch).count(), 60);
        assert!(result.summary.stay_total_cash_out_aed > 0.0);
        assert!(result.summary.switch_total_cash_out_aed > 0.0);
        assert!(result.upfront_fees_applied.switch > 0.0);
        assert_eq!(result.upfront_fees_applied.stay, 0.0);
        assert_eq!(result.summary.scenario, "base");
    }

    #[test]
    fn test_cheaper_offer_recommends_switch() {
        // 7.2% stay against a 3.99% fix easily recovers ~22.6k of fees in 5 years
        let result = compare(&input()).unwrap();
        assert_eq!(result.summary.recommendation, OptionKind::Switch);
        assert!(result.summary.savings_aed > 0.0);
        // The cheaper payment wins from the first month
        assert_eq!(result.summary.break_even_month, Some(1));
    }

    #[test]
    fn test_recommendation_matches_totals() {
        for name in ["base", "low"] {
            let result = compare_with_scenario(&input(), name).unwrap();
            let s = &result.summary;
            assert_eq!(
                s.recommendation == OptionKind::Switch,
                s.switch_total_cash_out_aed < s.stay_total_cash_out_aed
            );
        }
    }

    #[test]
    fn test_unknown_scenario() {
        let err = compare_with_scenario(&input(), "stress").unwrap_err();
        assert!(matches!(err, EngineError::UnknownScenario(ref name) if name == "stress"));
    }

    #[test]
    fn test_missing_base_scenario() {
        let mut scenario = input();
        scenario.rate_scenarios.remove("base");
        let err = compare(&scenario).unwrap_err();
        assert!(matches!(err, EngineError::MissingField { .. }));
    }

    #[test]
    fn test_break_even_never_reached() {
        // Same index, wider margin: every switch payment is larger
        let mut scenario = input();
        let mut offer = scenario.current_terms.clone();
        offer.rate_model = crate::input::RateModel::Floating {
            index_type: "EIBOR_1M".to_string(),
            margin_bps: 300.0,
            floor_rate_annual: 0.0,
        };
        scenario.new_offer = offer;
        let result = compare(&scenario).unwrap();
        assert_eq!(result.summary.break_even_month, None);
        assert_eq!(result.summary.recommendation, OptionKind::Stay);
    }

    #[test]
    fn test_identical_terms_break_even_immediately() {
        // Equal monthly cash out; the upfront fees only decide the recommendation
        let mut scenario = input();
        scenario.new_offer = scenario.current_terms.clone();
        let result = compare(&scenario).unwrap();
        assert_eq!(result.summary.break_even_month, Some(1));
        assert_eq!(result.summary.recommendation, OptionKind::Stay);
        assert!(result.summary.savings_aed < 0.0);
    }

    #[test]
    fn test_break_even_ignores_upfront_fees() {
        let with_fees = compare(&input()).unwrap();
        let mut scenario = input();
        scenario.assumptions.auto_estimate_buyout_fees = false;
        let without_fees = compare(&scenario).unwrap();

        assert!(with_fees.upfront_fees_applied.switch > 0.0);
        assert_eq!(without_fees.upfront_fees_applied.switch, 0.0);
        assert_eq!(with_fees.summary.break_even_month, without_fees.summary.break_even_month);
    }

    #[test]
    fn test_cumulative_cash_out_starts_at_zero() {
        let scenario = input();
        let config = SimulationConfig::from_input(&scenario);
        let engine = AmortizationEngine::new(config);
        let option = LoanOption::switch(&scenario);
        let resolver = RateResolver::new(&option.terms().rate_model, &scenario.rate_scenarios["base"]);
        let projection = engine.simulate(option, &resolver, &[]);

        assert!(projection.upfront_fees > 0.0);
        let cumulative = cumulative_cash_out(&projection);
        assert_eq!(cumulative[0], projection.cashflows[0].cash_out());
        assert_eq!(cumulative.len(), projection.cashflows.len());
    }

    #[test]
    fn test_fee_breakdown_per_option() {
        let result = compare(&input()).unwrap();
        assert!(result.fees_breakdown.stay.is_empty());
        assert_eq!(result.fees_breakdown.switch.len(), 7);
        assert_eq!(result.fees_breakdown.get(OptionKind::Switch).len(), 7);
        assert!(result.summary.assumptions_note.contains("buyout fee estimates"));
        assert_eq!(result.option_totals.switch.upfront_fees, result.upfront_fees_applied.switch);
        assert_eq!(result.option_totals.stay.total_months, 60);
    }

    #[test]
    fn test_compare_is_idempotent() {
        let scenario = input();
        let a = serde_json::to_string(&compare(&scenario).unwrap()).unwrap();
        let b = serde_json::to_string(&compare(&scenario).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
