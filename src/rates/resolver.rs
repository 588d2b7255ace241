//! Applicable annual rate for a loan at a given month

use super::curve::RateScenario;
use crate::input::RateModel;

/// One basis point as a decimal rate
pub const BPS: f64 = 0.0001;

/// Resolves the annual rate of one rate model against one curve set
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    model: &'a RateModel,
    curves: &'a RateScenario,
}

impl<'a> RateResolver<'a> {
    pub fn new(model: &'a RateModel, curves: &'a RateScenario) -> Self {
        Self { model, curves }
    }

    /// Annual rate for a 1-indexed simulation month
    pub fn rate_for_month(&self, month: u32) -> f64 {
        match self.model {
            RateModel::Floating {
                index_type,
                margin_bps,
                floor_rate_annual,
            } => self.floating(index_type, *margin_bps, *floor_rate_annual, month),
            RateModel::FixedThenFloating {
                fixed_rate_annual,
                fixed_months,
                reversion_index_type,
                reversion_margin_bps,
                floor_rate_annual,
            } => {
                if month <= *fixed_months {
                    *fixed_rate_annual
                } else {
                    // Reversion curve starts at its own month 1
                    self.floating(
                        reversion_index_type,
                        *reversion_margin_bps,
                        *floor_rate_annual,
                        month - fixed_months,
                    )
                }
            }
        }
    }

    fn floating(&self, index_type: &str, margin_bps: f64, floor: f64, curve_month: u32) -> f64 {
        let index = self.curves.index_value(index_type, curve_month);
        index.max(floor) + margin_bps * BPS
    }
}
