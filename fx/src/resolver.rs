//! Rate resolution over a catalog snapshot.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::rate::{ExchangeRate, ResolvedRate};

/// Pick the rate for `from_currency -> to_currency`.
///
/// Priority is identity, then a direct active row, then an active reverse
/// row with a positive rate (inverted, fee policy kept from that row).
/// Codes are compared exactly; callers normalize them first.
pub fn resolve_rate<'a>(
    catalog: &'a [ExchangeRate],
    from_currency: &str,
    to_currency: &str,
) -> FxResult<ResolvedRate<'a>> {
    if from_currency == to_currency {
        return Ok(ResolvedRate::Identity);
    }

    let mut active = catalog.iter().filter(|row| row.is_active());

    if let Some(row) = active.clone().find(|row| {
        row.from_currency.code() == from_currency && row.to_currency.code() == to_currency
    }) {
        debug!(pair = %row.pair(), rate = %row.rate, "Resolved direct rate");
        return Ok(ResolvedRate::Stored(row));
    }

    // A non-positive reverse rate counts as missing.
    if let Some(row) = active.find(|row| {
        row.from_currency.code() == to_currency
            && row.to_currency.code() == from_currency
            && row.rate > Decimal::ZERO
    }) {
        let effective_rate = Decimal::ONE / row.rate;
        debug!(
            pair = %row.pair(),
            stored_rate = %row.rate,
            effective_rate = %effective_rate,
            "Resolved inverted rate"
        );
        return Ok(ResolvedRate::Inverted {
            original: row,
            effective_rate,
        });
    }

    Err(FxError::rate_not_found(from_currency, to_currency))
}
