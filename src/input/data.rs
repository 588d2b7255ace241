//! Typed scenario structures, validated once at the boundary

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rates::RateScenario;

/// Index used by a fixed-rate offer when the payload names no reversion index
pub const DEFAULT_REVERSION_INDEX: &str = "EIBOR_3M";

/// Reset cadence assumed for a new offer that does not state one
pub const DEFAULT_OFFER_RESET_FREQ_MONTHS: u32 = 3;

/// Name of the rate scenario the comparator runs by default
pub const BASE_SCENARIO: &str = "base";

/// How the annual rate of a loan is determined over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateModel {
    /// Index + margin, with the index floored
    Floating {
        index_type: String,
        margin_bps: f64,
        floor_rate_annual: f64,
    },
    /// Fixed rate for `fixed_months`, then reverts to index + margin
    FixedThenFloating {
        fixed_rate_annual: f64,
        fixed_months: u32,
        reversion_index_type: String,
        reversion_margin_bps: f64,
        floor_rate_annual: f64,
    },
}

/// Life insurance charging method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceMethod {
    #[default]
    None,
    /// Annual rate applied monthly to the outstanding balance
    PercentOfOutstanding,
    /// Flat monthly premium
    FixedMonthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LifeInsurance {
    pub method: InsuranceMethod,
    pub value: f64,
}

impl LifeInsurance {
    /// Monthly premium given the month's post-paydown balance
    pub fn monthly_cost(&self, outstanding: f64) -> f64 {
        match self.method {
            InsuranceMethod::PercentOfOutstanding => outstanding * (self.value / 12.0),
            InsuranceMethod::FixedMonthly => self.value,
            InsuranceMethod::None => 0.0,
        }
    }
}

/// When a fee is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTiming {
    Upfront,
    Monthly,
    /// Charged in the first month of every 12-month block
    Annual,
}

/// A single itemized fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(rename = "type")]
    pub fee_type: String,
    pub amount_aed: f64,
    pub timing: FeeTiming,
}

impl Fee {
    pub fn upfront(fee_type: &str, amount_aed: f64) -> Self {
        Self {
            fee_type: fee_type.to_string(),
            amount_aed,
            timing: FeeTiming::Upfront,
        }
    }
}

/// Penalty the current lender charges for settling the loan early
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EarlySettlement {
    pub percent_of_outstanding: f64,
    /// Cap on the penalty; 0 means uncapped
    pub cap_aed: f64,
}

impl EarlySettlement {
    /// Penalty for settling `principal`, `None` when the lender charges none
    pub fn penalty(&self, principal: f64) -> Option<f64> {
        if self.percent_of_outstanding <= 0.0 {
            return None;
        }
        let fee = principal * self.percent_of_outstanding;
        Some(if self.cap_aed > 0.0 { fee.min(self.cap_aed) } else { fee })
    }
}

/// One side of the comparison: the current loan or the new offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub bank: String,
    pub rate_model: RateModel,
    /// Cadence at which the rate and payment are re-evaluated (>= 1)
    pub reset_freq_months: u32,
    pub life_insurance: LifeInsurance,
    pub fees: Vec<Fee>,
    pub early_settlement: EarlySettlement,
}

impl LoanTerms {
    pub fn has_fee(&self, fee_type: &str) -> bool {
        self.fees.iter().any(|f| f.fee_type == fee_type)
    }
}

/// What a one-off prepayment does to the remaining schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentMethod {
    /// Keep the payment; the balance reaches zero earlier
    ReduceTenure,
    /// Recompute the payment over the remaining tenure
    ReduceEmi,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentEvent {
    /// 1-indexed simulation month
    pub month: u32,
    pub amount: f64,
    pub method: PrepaymentMethod,
}

/// When the simulator re-derives the rate and the level payment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecomputePolicy {
    /// Only at month 1 and on each reset boundary
    #[default]
    OnResetOnly,
    /// Every month
    EveryMonth,
}

impl From<String> for RecomputePolicy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "on_reset_only" => RecomputePolicy::OnResetOnly,
            _ => RecomputePolicy::EveryMonth,
        }
    }
}

impl From<RecomputePolicy> for String {
    fn from(value: RecomputePolicy) -> Self {
        match value {
            RecomputePolicy::OnResetOnly => "on_reset_only".to_string(),
            RecomputePolicy::EveryMonth => "every_month".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub recompute_policy: RecomputePolicy,
    pub auto_estimate_buyout_fees: bool,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            recompute_policy: RecomputePolicy::OnResetOnly,
            auto_estimate_buyout_fees: true,
        }
    }
}

/// A complete, validated comparison request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub principal_aed: f64,
    pub tenure_months: u32,
    /// Projection window, never longer than `tenure_months`
    pub horizon_months: u32,
    pub current_terms: LoanTerms,
    pub new_offer: LoanTerms,
    pub rate_scenarios: BTreeMap<String, RateScenario>,
    pub prepayment_plan: Vec<PrepaymentEvent>,
    pub assumptions: Assumptions,
}

impl ScenarioInput {
    pub fn scenario(&self, name: &str) -> Option<&RateScenario> {
        self.rate_scenarios.get(name)
    }
}

/// The two options under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Stay,
    Switch,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Stay => "stay",
            OptionKind::Switch => "switch",
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An option together with the terms it runs under
#[derive(Debug, Clone, Copy)]
pub enum LoanOption<'a> {
    Stay {
        terms: &'a LoanTerms,
    },
    /// Refinance to `offer`, settling the loan held under `leaving`
    Switch {
        offer: &'a LoanTerms,
        leaving: &'a LoanTerms,
    },
}

impl<'a> LoanOption<'a> {
    pub fn stay(input: &'a ScenarioInput) -> Self {
        LoanOption::Stay {
            terms: &input.current_terms,
        }
    }

    pub fn switch(input: &'a ScenarioInput) -> Self {
        LoanOption::Switch {
            offer: &input.new_offer,
            leaving: &input.current_terms,
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            LoanOption::Stay { .. } => OptionKind::Stay,
            LoanOption::Switch { .. } => OptionKind::Switch,
        }
    }

    /// Terms the loan is serviced under for this option
    pub fn terms(&self) -> &'a LoanTerms {
        match self {
            LoanOption::Stay { terms } => terms,
            LoanOption::Switch { offer, .. } => offer,
        }
    }
}
