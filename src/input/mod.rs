//! Scenario input structures and payload loading

mod data;
pub mod loader;

pub use data::{
    Assumptions, EarlySettlement, Fee, FeeTiming, InsuranceMethod, LifeInsurance, LoanOption,
    LoanTerms, OptionKind, PrepaymentEvent, PrepaymentMethod, RateModel, RecomputePolicy,
    ScenarioInput, BASE_SCENARIO, DEFAULT_OFFER_RESET_FREQ_MONTHS, DEFAULT_REVERSION_INDEX,
};
pub use loader::{load_scenario, parse_scenario, scenario_from_value, MAX_TENURE_MONTHS};
