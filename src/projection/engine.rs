//! Core amortization engine for monthly loan cashflow projections

use crate::input::{LoanOption, PrepaymentEvent, PrepaymentMethod, RecomputePolicy, ScenarioInput};
use crate::rates::RateResolver;
use super::cashflows::{round2, MonthlyRecord, OptionProjection};
use super::fees::{BuyoutFeeSchedule, FeeSchedule};
use super::state::AmortizationState;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Starting balance
    pub principal: f64,

    /// Contractual term the level payment amortizes over
    pub tenure_months: u32,

    /// Number of months to project
    pub horizon_months: u32,

    /// When the rate and payment are re-derived
    pub recompute_policy: RecomputePolicy,

    /// Synthesize buyout fees the switch option does not itemize
    pub auto_estimate_buyout_fees: bool,

    /// Fee constants used for estimation
    pub buyout_fees: BuyoutFeeSchedule,
}

impl SimulationConfig {
    pub fn from_input(input: &ScenarioInput) -> Self {
        Self {
            principal: input.principal_aed,
            tenure_months: input.tenure_months,
            horizon_months: input.horizon_months,
            recompute_policy: input.assumptions.recompute_policy.clone(),
            auto_estimate_buyout_fees: input.assumptions.auto_estimate_buyout_fees,
            buyout_fees: BuyoutFeeSchedule::default(),
        }
    }

    /// Last month the simulation may reach
    pub fn last_month(&self) -> u32 {
        self.horizon_months.min(self.tenure_months)
    }
}

/// Level payment amortizing `balance` over `months` at `monthly_rate`
pub fn level_payment(balance: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return balance;
    }
    if monthly_rate == 0.0 {
        return balance / months as f64;
    }
    let factor = (1.0 + monthly_rate).powi(months as i32);
    balance * monthly_rate * factor / (factor - 1.0)
}

/// Split a payment into (payment made, principal repaid)
///
/// A payment that does not cover interest is reported as interest-only;
/// the unpaid difference is not capitalized.
pub(crate) fn split_payment(payment: f64, interest: f64) -> (f64, f64) {
    if payment >= interest {
        (payment, payment - interest)
    } else {
        (interest, 0.0)
    }
}

/// Main amortization engine
pub struct AmortizationEngine {
    config: SimulationConfig,
}

impl AmortizationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the simulation for one option
    pub fn simulate(
        &self,
        option: LoanOption<'_>,
        resolver: &RateResolver<'_>,
        prepayments: &[PrepaymentEvent],
    ) -> OptionProjection {
        let config = &self.config;
        let terms = option.terms();

        let fees = FeeSchedule::for_option(
            &option,
            config.principal,
            &config.buyout_fees,
            config.auto_estimate_buyout_fees,
        );

        let mut result = OptionProjection::new(option.kind(), fees.items.clone());
        let mut state = AmortizationState::new(config.principal);
        let mut total_cash_out = fees.upfront;

        while state.month < config.last_month() && !state.is_repaid() {
            state.advance_month();
            let row = self.calculate_month(&option, resolver, prepayments, &fees, &mut state);
            total_cash_out += row.cash_out;
            result.add_row(row.record);
        }

        result.upfront_fees = round2(fees.upfront);
        result.total_cash_out = round2(total_cash_out);

        log::debug!(
            "{} ({}): {} months, upfront {:.2}, total cash out {:.2}, balance {:.2}",
            option.kind(),
            terms.bank,
            result.cashflows.len(),
            result.upfront_fees,
            result.total_cash_out,
            state.outstanding,
        );

        result
    }

    fn should_recompute(&self, month: u32, reset_freq_months: u32) -> bool {
        match self.config.recompute_policy {
            RecomputePolicy::OnResetOnly => {
                month == 1 || (month - 1) % reset_freq_months.max(1) == 0
            }
            RecomputePolicy::EveryMonth => true,
        }
    }

    /// Calculate one month and advance the balance
    fn calculate_month(
        &self,
        option: &LoanOption<'_>,
        resolver: &RateResolver<'_>,
        prepayments: &[PrepaymentEvent],
        fees: &FeeSchedule,
        state: &mut AmortizationState,
    ) -> MonthOutcome {
        let terms = option.terms();
        let tenure = self.config.tenure_months;
        let month = state.month;

        // Rate and payment are held between resets
        if self.should_recompute(month, terms.reset_freq_months) {
            state.annual_rate = resolver.rate_for_month(month);
            state.payment = level_payment(
                state.outstanding,
                state.monthly_rate(),
                state.months_including_current(tenure),
            );
        }

        let interest = state.outstanding * state.monthly_rate();
        let (mut payment, principal_paid) = split_payment(state.payment, interest);
        state.pay_down(principal_paid);

        // Insurance is charged on the post-paydown balance
        let insurance = terms.life_insurance.monthly_cost(state.outstanding);
        let month_fees = fees.fees_for_month(month);

        let mut prepaid = 0.0;
        for event in prepayments.iter().filter(|e| e.month == month) {
            let amount = event.amount.min(state.outstanding);
            state.pay_down(amount);
            prepaid += amount;

            // The re-levelled payment is the one charged this month
            if event.method == PrepaymentMethod::ReduceEmi {
                state.payment = level_payment(
                    state.outstanding,
                    state.monthly_rate(),
                    state.months_including_current(tenure),
                );
                payment = state.payment;
            }
        }

        MonthOutcome {
            record: MonthlyRecord {
                month,
                option: option.kind(),
                emi: round2(payment),
                interest: round2(interest),
                principal_paid: round2(principal_paid),
                fees: round2(month_fees),
                insurance: round2(insurance),
                prepayment: round2(prepaid),
                annual_rate: state.annual_rate,
                principal_remaining: round2(state.outstanding),
            },
            cash_out: payment + month_fees + insurance,
        }
    }
}

/// A month's rounded record plus its unrounded cash out
struct MonthOutcome {
    record: MonthlyRecord,
    cash_out: f64,
}
