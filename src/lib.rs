//! Mortgage Switch - Stay-versus-switch refinance comparison for UAE mortgages
//!
//! This library provides:
//! - Rate resolution for floating and fixed-then-floating loans against index curves
//! - Month-by-month amortization with resets, insurance, fees and prepayments
//! - UAE buyout fee estimation and early-settlement penalties
//! - Break-even and recommendation across both options
//! - Multi-scenario comparison over named rate curve sets

pub mod error;
pub mod input;
pub mod rates;
pub mod projection;
pub mod comparison;
pub mod scenario;
pub mod request;

// Re-export commonly used types
pub use error::EngineError;
pub use input::{LoanTerms, OptionKind, ScenarioInput};
pub use rates::{RateCurve, RateResolver, RateScenario};
pub use projection::{AmortizationEngine, MonthlyRecord, OptionProjection, SimulationConfig};
pub use comparison::{compare, compare_with_scenario, ComparisonResult};
pub use scenario::ScenarioRunner;
