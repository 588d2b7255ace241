//! Fee assembly for each option
//!
//! The switch option carries the standard UAE refinance (buyout) charges
//! whenever the offer or the current lender has not itemized them, plus the
//! old bank's early-settlement penalty.

use serde::{Deserialize, Serialize};

use crate::input::{Fee, FeeTiming, LoanOption, LoanTerms};

pub const PROCESSING_FEE: &str = "processing_fee";
pub const VALUATION_FEE: &str = "valuation_fee";
pub const DLD_FEE: &str = "dld_fee";
pub const TRUSTEE_FEE: &str = "trustee_fee";
pub const MORTGAGE_REGISTRATION_FEE: &str = "mortgage_registration_fee";
pub const RELEASE_LETTER_FEE: &str = "release_letter_fee";
pub const LIABILITY_LETTER_FEE: &str = "liability_letter_fee";
pub const EARLY_SETTLEMENT_PENALTY: &str = "early_settlement_penalty_old_bank";

/// Standard refinance charges used when fees are estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyoutFeeSchedule {
    /// New bank processing fee as a fraction of principal
    pub processing_fee_rate: f64,
    pub processing_fee_cap: f64,
    pub valuation_fee: f64,
    /// Dubai Land Department mortgage fee as a fraction of principal
    pub dld_fee_rate: f64,
    pub dld_fee_flat: f64,
    pub trustee_fee: f64,
    pub mortgage_registration_fee: f64,
    /// Charged by the current lender on exit
    pub release_letter_fee: f64,
    pub liability_letter_fee: f64,
}

impl Default for BuyoutFeeSchedule {
    fn default() -> Self {
        Self {
            processing_fee_rate: 0.01,
            processing_fee_cap: 10_000.0,
            valuation_fee: 2_500.0,
            dld_fee_rate: 0.0025,
            dld_fee_flat: 290.0,
            trustee_fee: 4_200.0,
            mortgage_registration_fee: 2_000.0,
            release_letter_fee: 1_000.0,
            liability_letter_fee: 100.0,
        }
    }
}

impl BuyoutFeeSchedule {
    /// New-bank charges the offer does not already itemize
    pub fn estimate_new_bank_fees(&self, principal: f64, offer: &LoanTerms) -> Vec<Fee> {
        let candidates = [
            (
                PROCESSING_FEE,
                (self.processing_fee_rate * principal).min(self.processing_fee_cap),
            ),
            (VALUATION_FEE, self.valuation_fee),
            (DLD_FEE, self.dld_fee_rate * principal + self.dld_fee_flat),
            (TRUSTEE_FEE, self.trustee_fee),
            (MORTGAGE_REGISTRATION_FEE, self.mortgage_registration_fee),
        ];
        missing_fees(&candidates, offer)
    }

    /// Exit letters the current lender does not already itemize
    pub fn estimate_exit_fees(&self, leaving: &LoanTerms) -> Vec<Fee> {
        let candidates = [
            (RELEASE_LETTER_FEE, self.release_letter_fee),
            (LIABILITY_LETTER_FEE, self.liability_letter_fee),
        ];
        missing_fees(&candidates, leaving)
    }
}

fn missing_fees(candidates: &[(&str, f64)], terms: &LoanTerms) -> Vec<Fee> {
    candidates
        .iter()
        .filter(|(fee_type, _)| !terms.has_fee(fee_type))
        .map(|(fee_type, amount)| Fee::upfront(fee_type, *amount))
        .collect()
}

/// Fees applying to one option, bucketed by timing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeeSchedule {
    pub items: Vec<Fee>,
    pub upfront: f64,
    pub monthly: f64,
    pub annual: f64,
}

impl FeeSchedule {
    pub fn from_fees(items: Vec<Fee>) -> Self {
        let mut schedule = Self::default();
        for fee in &items {
            match fee.timing {
                FeeTiming::Upfront => schedule.upfront += fee.amount_aed,
                FeeTiming::Monthly => schedule.monthly += fee.amount_aed,
                FeeTiming::Annual => schedule.annual += fee.amount_aed,
            }
        }
        schedule.items = items;
        schedule
    }

    /// Assemble the full fee list for an option
    ///
    /// The option's own fees come first, then (switch only) estimated buyout
    /// fees, then the early-settlement penalty.
    pub fn for_option(
        option: &LoanOption<'_>,
        principal: f64,
        buyout: &BuyoutFeeSchedule,
        auto_estimate: bool,
    ) -> Self {
        let mut items = option.terms().fees.clone();

        if let LoanOption::Switch { offer, leaving } = option {
            if auto_estimate {
                items.extend(buyout.estimate_new_bank_fees(principal, offer));
                items.extend(buyout.estimate_exit_fees(leaving));
            }
            if let Some(penalty) = leaving.early_settlement.penalty(principal) {
                items.push(Fee::upfront(EARLY_SETTLEMENT_PENALTY, penalty));
            }
        }

        Self::from_fees(items)
    }

    /// Recurring fees charged in a 1-indexed month
    pub fn fees_for_month(&self, month: u32) -> f64 {
        if month % 12 == 1 {
            self.monthly + self.annual
        } else {
            self.monthly
        }
    }
}
