//! Month-by-month amortization of one loan option

mod state;
mod engine;
mod cashflows;
pub mod fees;

pub use state::AmortizationState;
pub use engine::{AmortizationEngine, SimulationConfig, level_payment};
pub use cashflows::{MonthlyRecord, OptionProjection, OptionSummary, round2};
pub use fees::{BuyoutFeeSchedule, FeeSchedule};
