//! Fee calculation.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{FxError, FxResult};
use crate::rate::{FeePolicy, FeeType, ResolvedRate};

impl FeePolicy {
    /// Fee charged on a send-side `amount` under this policy.
    ///
    /// Percentage fees are in percentage points (0-100). Unknown fee types
    /// charge nothing. Returns `None` if the fee overflows.
    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        let fee = match self.fee_type {
            FeeType::Free => Decimal::ZERO,
            FeeType::Fixed => self.fee_amount,
            FeeType::Percentage => amount.checked_mul(self.fee_amount)? / Decimal::ONE_HUNDRED,
            FeeType::Unknown => {
                warn!(
                    fee_amount = %self.fee_amount,
                    "Unrecognized fee type in rate catalog, charging no fee"
                );
                Decimal::ZERO
            }
        };
        Some(fee)
    }
}

/// Fee for sending `amount` at `rate`. Always computed on the send side.
pub fn calculate_fee(amount: Decimal, rate: &ResolvedRate<'_>) -> FxResult<Decimal> {
    rate.fee_policy()
        .apply(amount)
        .ok_or(FxError::AmountOutOfRange(amount))
}
