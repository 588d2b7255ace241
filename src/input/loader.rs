//! Load scenario payloads from JSON
//!
//! Raw payload rows are deserialized with every optional field left as
//! `Option`, then converted into the typed structures in one place so each
//! documented default is applied exactly once.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::data::{
    Assumptions, EarlySettlement, Fee, InsuranceMethod, LifeInsurance, LoanTerms,
    PrepaymentEvent, RateModel, RecomputePolicy, ScenarioInput,
    DEFAULT_OFFER_RESET_FREQ_MONTHS, DEFAULT_REVERSION_INDEX,
};
use crate::error::{EngineError, Result};
use crate::rates::RateScenario;

/// Longest tenure accepted (100 years)
pub const MAX_TENURE_MONTHS: u32 = 1_200;

#[derive(Debug, Deserialize)]
struct RawScenario {
    principal_aed: Option<f64>,
    tenure_months: Option<u32>,
    horizon_months: Option<u32>,
    current_terms: Option<RawTerms>,
    new_offer: Option<RawTerms>,
    rate_scenarios: Option<BTreeMap<String, RateScenario>>,
    #[serde(default)]
    prepayment_plan: Vec<PrepaymentEvent>,
    #[serde(default)]
    assumptions: RawAssumptions,
}

#[derive(Debug, Default, Deserialize)]
struct RawAssumptions {
    recompute_policy: Option<RecomputePolicy>,
    auto_estimate_buyout_fees: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawTerms {
    bank: Option<String>,
    index_type: Option<String>,
    margin_bps: Option<f64>,
    floor_rate_annual: Option<f64>,
    reset_freq_months: Option<u32>,
    life_insurance_method: Option<InsuranceMethod>,
    life_insurance_value: Option<f64>,
    #[serde(default)]
    fees: Vec<Fee>,
    early_settlement: Option<RawEarlySettlement>,
    fixed_rate_annual: Option<f64>,
    fixed_months: Option<u32>,
    reversion_index_type: Option<String>,
    reversion_margin_bps: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEarlySettlement {
    percent_of_outstanding: Option<f64>,
    cap_aed: Option<f64>,
}

/// Which side of the comparison a terms block describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Current,
    Offer,
}

impl Side {
    fn key(&self) -> &'static str {
        match self {
            Side::Current => "current_terms",
            Side::Offer => "new_offer",
        }
    }
}

/// Load a scenario from a JSON file
pub fn load_scenario(path: &Path) -> Result<ScenarioInput> {
    let file = File::open(path)?;
    parse_scenario(BufReader::new(file))
}

/// Parse a scenario from any JSON reader
pub fn parse_scenario<R: Read>(reader: R) -> Result<ScenarioInput> {
    let raw: RawScenario = serde_json::from_reader(reader)?;
    raw.into_scenario()
}

/// Convert an already-decoded JSON value into a scenario
pub fn scenario_from_value(value: serde_json::Value) -> Result<ScenarioInput> {
    let raw: RawScenario = serde_json::from_value(value)?;
    raw.into_scenario()
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| EngineError::missing(field))
}

fn finite(value: f64, field: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid(field, "must be a finite number"))
    }
}

fn non_negative(value: f64, field: &str) -> Result<f64> {
    let value = finite(value, field)?;
    if value < 0.0 {
        return Err(EngineError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(value)
}

impl RawScenario {
    fn into_scenario(self) -> Result<ScenarioInput> {
        let principal_aed = finite(require(self.principal_aed, "principal_aed")?, "principal_aed")?;
        if principal_aed <= 0.0 {
            return Err(EngineError::invalid("principal_aed", "must be positive"));
        }

        let tenure_months = require(self.tenure_months, "tenure_months")?;
        if tenure_months == 0 {
            return Err(EngineError::invalid("tenure_months", "must be at least 1"));
        }
        if tenure_months > MAX_TENURE_MONTHS {
            return Err(EngineError::invalid(
                "tenure_months",
                format!("must not exceed {} months", MAX_TENURE_MONTHS),
            ));
        }

        let mut horizon_months = require(self.horizon_months, "horizon_months")?;
        if horizon_months == 0 {
            return Err(EngineError::invalid("horizon_months", "must be at least 1"));
        }
        if horizon_months > tenure_months {
            log::warn!(
                "horizon_months {} exceeds tenure_months {}; clamping to tenure",
                horizon_months,
                tenure_months
            );
            horizon_months = tenure_months;
        }

        let current_raw = require(self.current_terms, "current_terms")?;
        let offer_raw = require(self.new_offer, "new_offer")?;
        let rate_scenarios = require(self.rate_scenarios, "rate_scenarios")?;

        for (name, scenario) in &rate_scenarios {
            for index_type in scenario.index_types() {
                if let Some(curve) = scenario.curve(index_type) {
                    if curve.is_empty() {
                        log::debug!("Curve {}.{} is empty and reads as 0", name, index_type);
                    }
                    if curve.values().iter().any(|v| !v.is_finite()) {
                        return Err(EngineError::invalid(
                            format!("rate_scenarios.{}.{}", name, index_type),
                            "contains a non-finite rate",
                        ));
                    }
                }
            }
        }

        let current_terms = current_raw.into_terms(Side::Current, None)?;
        let new_offer = offer_raw.into_terms(Side::Offer, Some(current_terms.life_insurance))?;

        for (i, event) in self.prepayment_plan.iter().enumerate() {
            let field = format!("prepayment_plan[{}]", i);
            if event.month == 0 {
                return Err(EngineError::invalid(format!("{}.month", field), "months are 1-indexed"));
            }
            non_negative(event.amount, &format!("{}.amount", field))?;
        }

        let defaults = Assumptions::default();
        let assumptions = Assumptions {
            recompute_policy: self
                .assumptions
                .recompute_policy
                .unwrap_or(defaults.recompute_policy),
            auto_estimate_buyout_fees: self
                .assumptions
                .auto_estimate_buyout_fees
                .unwrap_or(defaults.auto_estimate_buyout_fees),
        };

        Ok(ScenarioInput {
            principal_aed,
            tenure_months,
            horizon_months,
            current_terms,
            new_offer,
            rate_scenarios,
            prepayment_plan: self.prepayment_plan,
            assumptions,
        })
    }
}

impl RawTerms {
    /// `inherited_insurance` is used when the block states no insurance of its own
    fn into_terms(self, side: Side, inherited_insurance: Option<LifeInsurance>) -> Result<LoanTerms> {
        let key = side.key();
        let field = |name: &str| format!("{}.{}", key, name);

        let bank = require(self.bank, &field("bank"))?;
        let floor_rate_annual = finite(self.floor_rate_annual.unwrap_or(0.0), &field("floor_rate_annual"))?;

        let rate_model = match (self.fixed_rate_annual, self.index_type) {
            (Some(fixed_rate_annual), _) => RateModel::FixedThenFloating {
                fixed_rate_annual: finite(fixed_rate_annual, &field("fixed_rate_annual"))?,
                fixed_months: require(self.fixed_months, &field("fixed_months"))?,
                reversion_index_type: self
                    .reversion_index_type
                    .unwrap_or_else(|| DEFAULT_REVERSION_INDEX.to_string()),
                reversion_margin_bps: finite(
                    self.reversion_margin_bps.unwrap_or(0.0),
                    &field("reversion_margin_bps"),
                )?,
                floor_rate_annual,
            },
            (None, Some(index_type)) => RateModel::Floating {
                index_type,
                margin_bps: finite(require(self.margin_bps, &field("margin_bps"))?, &field("margin_bps"))?,
                floor_rate_annual,
            },
            (None, None) => {
                let preferred = match side {
                    Side::Current => "index_type",
                    Side::Offer => "fixed_rate_annual",
                };
                return Err(EngineError::missing(field(preferred)));
            }
        };

        let reset_freq_months = match side {
            Side::Current => require(self.reset_freq_months, &field("reset_freq_months"))?,
            Side::Offer => self.reset_freq_months.unwrap_or(DEFAULT_OFFER_RESET_FREQ_MONTHS),
        };
        if reset_freq_months == 0 {
            return Err(EngineError::invalid(field("reset_freq_months"), "must be at least 1"));
        }

        let life_insurance = match (self.life_insurance_method, self.life_insurance_value) {
            (None, None) => inherited_insurance.unwrap_or_default(),
            (method, value) => LifeInsurance {
                method: method.unwrap_or_default(),
                value: non_negative(value.unwrap_or(0.0), &field("life_insurance_value"))?,
            },
        };

        for (i, fee) in self.fees.iter().enumerate() {
            non_negative(fee.amount_aed, &field(&format!("fees[{}].amount_aed", i)))?;
        }

        let es = self.early_settlement.unwrap_or_default();
        let early_settlement = EarlySettlement {
            percent_of_outstanding: non_negative(
                es.percent_of_outstanding.unwrap_or(0.0),
                &field("early_settlement.percent_of_outstanding"),
            )?,
            cap_aed: non_negative(es.cap_aed.unwrap_or(0.0), &field("early_settlement.cap_aed"))?,
        };

        Ok(LoanTerms {
            bank,
            rate_model,
            reset_freq_months,
            life_insurance,
            fees: self.fees,
            early_settlement,
        })
    }
}
