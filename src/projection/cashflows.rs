//! Ledger output structures for one simulated option

use serde::{Deserialize, Serialize};

use crate::input::{Fee, OptionKind};

/// Round a currency amount to fils (2 decimal places)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single month of one option's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,
    pub option: OptionKind,
    /// Payment made this month (interest + scheduled principal)
    pub emi: f64,
    pub interest: f64,
    pub principal_paid: f64,
    /// Recurring fees charged this month
    pub fees: f64,
    pub insurance: f64,
    /// One-off prepayment applied this month
    pub prepayment: f64,
    /// Annual rate in force this month
    pub annual_rate: f64,
    pub principal_remaining: f64,
}

impl MonthlyRecord {
    /// Cash paid out this month, excluding prepayments
    pub fn cash_out(&self) -> f64 {
        self.emi + self.fees + self.insurance
    }
}

/// Complete simulation result for one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionProjection {
    pub option: OptionKind,

    /// Monthly ledger; months after full repayment are absent
    pub cashflows: Vec<MonthlyRecord>,

    /// Upfront fees plus all monthly cash out over the horizon
    pub total_cash_out: f64,

    /// Sum of upfront fees charged at month 0
    pub upfront_fees: f64,

    /// Every fee that applied to this option, including estimated ones
    pub fees: Vec<Fee>,
}

impl OptionProjection {
    pub fn new(option: OptionKind, fees: Vec<Fee>) -> Self {
        Self {
            option,
            cashflows: Vec::new(),
            total_cash_out: 0.0,
            upfront_fees: 0.0,
            fees,
        }
    }

    pub fn add_row(&mut self, row: MonthlyRecord) {
        self.cashflows.push(row);
    }

    /// Balance after the last simulated month
    pub fn final_balance(&self) -> Option<f64> {
        self.cashflows.last().map(|r| r.principal_remaining)
    }

    /// Get summary statistics
    pub fn summary(&self) -> OptionSummary {
        let total_payments: f64 = self.cashflows.iter().map(|r| r.emi).sum();
        let total_interest: f64 = self.cashflows.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.cashflows.iter().map(|r| r.principal_paid).sum();
        let total_recurring_fees: f64 = self.cashflows.iter().map(|r| r.fees).sum();
        let total_insurance: f64 = self.cashflows.iter().map(|r| r.insurance).sum();
        let total_prepaid: f64 = self.cashflows.iter().map(|r| r.prepayment).sum();

        OptionSummary {
            option: self.option,
            total_months: self.cashflows.len() as u32,
            total_payments: round2(total_payments),
            total_interest: round2(total_interest),
            total_principal: round2(total_principal),
            total_recurring_fees: round2(total_recurring_fees),
            total_insurance: round2(total_insurance),
            total_prepaid: round2(total_prepaid),
            upfront_fees: self.upfront_fees,
            total_cash_out: self.total_cash_out,
            final_balance: self.final_balance().unwrap_or(0.0),
        }
    }
}

/// Summary statistics for one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSummary {
    pub option: OptionKind,
    pub total_months: u32,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_recurring_fees: f64,
    pub total_insurance: f64,
    pub total_prepaid: f64,
    pub upfront_fees: f64,
    pub total_cash_out: f64,
    pub final_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: u32, emi: f64, remaining: f64) -> MonthlyRecord {
        MonthlyRecord {
            month,
            option: OptionKind::Stay,
            emi,
            interest: emi * 0.6,
            principal_paid: emi * 0.4,
            fees: 10.0,
            insurance: 5.0,
            prepayment: 0.0,
            annual_rate: 0.05,
            principal_remaining: remaining,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(99.995000001), 100.0);
    }

    #[test]
    fn test_cash_out_excludes_prepayment() {
        let mut r = row(1, 1000.0, 99_000.0);
        r.prepayment = 5_000.0;
        assert_eq!(r.cash_out(), 1015.0);
    }

    #[test]
    fn test_summary_totals() {
        let mut projection = OptionProjection::new(OptionKind::Stay, Vec::new());
        projection.add_row(row(1, 1000.0, 99_600.0));
        projection.add_row(row(2, 1000.0, 99_200.0));

        let summary = projection.summary();
        assert_eq!(summary.total_months, 2);
        assert_eq!(summary.total_payments, 2000.0);
        assert_eq!(summary.total_recurring_fees, 20.0);
        assert_eq!(summary.final_balance, 99_200.0);
    }

    #[test]
    fn test_empty_projection_summary() {
        let projection = OptionProjection::new(OptionKind::Switch, Vec::new());
        assert_eq!(projection.final_balance(), None);
        assert_eq!(projection.summary().final_balance, 0.0);
    }
}
