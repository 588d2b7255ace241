//! Running state of a loan during simulation

/// Balances below this are treated as fully repaid
const BALANCE_EPSILON: f64 = 1e-6;

/// State of one option's loan at a point in time during simulation
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current simulation month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Outstanding principal
    pub outstanding: f64,

    /// Annual rate currently applied
    pub annual_rate: f64,

    /// Level payment currently due
    pub payment: f64,
}

impl AmortizationState {
    /// Initialize state at drawdown
    pub fn new(principal: f64) -> Self {
        Self {
            month: 0,
            outstanding: principal,
            annual_rate: 0.0,
            payment: 0.0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    pub fn is_repaid(&self) -> bool {
        self.outstanding <= 0.0
    }

    /// Reduce the balance, flooring at zero
    pub fn pay_down(&mut self, amount: f64) {
        self.outstanding = (self.outstanding - amount).max(0.0);
        if self.outstanding < BALANCE_EPSILON {
            self.outstanding = 0.0;
        }
    }

    /// Months left in the tenure including the current month
    pub fn months_including_current(&self, tenure_months: u32) -> u32 {
        tenure_months.saturating_sub(self.month.saturating_sub(1))
    }
}
