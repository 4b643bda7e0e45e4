//! Order amount calculation.

use easner_common::round_cents;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::fee::calculate_fee;
use crate::rate::{ExchangeRate, FeeType};
use crate::resolver::resolve_rate;

/// Which side of the transfer the user fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The amount is what the sender pays in.
    Send,
    /// The amount is what the recipient gets.
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Send => f.write_str("send"),
            Direction::Receive => f.write_str("receive"),
        }
    }
}

/// Inputs of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub direction: Direction,
    pub amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
}

impl OrderRequest {
    /// Quote a send-side amount.
    pub fn send(amount: Decimal, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            direction: Direction::Send,
            amount,
            from_currency: from.into(),
            to_currency: to.into(),
        }
    }

    /// Quote a receive-side amount.
    pub fn receive(amount: Decimal, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            direction: Direction::Receive,
            ..Self::send(amount, from, to)
        }
    }

    /// Run the calculation against a catalog snapshot.
    pub fn calculate(&self, catalog: &[ExchangeRate]) -> FxResult<OrderAmounts> {
        calculate_order_amounts(
            self.direction,
            self.amount,
            &self.from_currency,
            &self.to_currency,
            catalog,
        )
    }
}

/// The amounts of a quoted transfer.
///
/// Every money field is rounded to cents; `exchange_rate` is kept at full
/// precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAmounts {
    pub send_amount: Decimal,
    pub receive_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub fee_type: FeeType,
    pub total_amount: Decimal,
}

/// Quote a transfer of `amount` from `from_currency` to `to_currency`.
///
/// Rounding happens once, at the end, on each output field independently.
/// The fee is taken on the unrounded send amount.
pub fn calculate_order_amounts(
    direction: Direction,
    amount: Decimal,
    from_currency: &str,
    to_currency: &str,
    catalog: &[ExchangeRate],
) -> FxResult<OrderAmounts> {
    if amount <= Decimal::ZERO {
        return Err(FxError::InvalidAmount(amount));
    }
    if from_currency.trim().is_empty() || to_currency.trim().is_empty() {
        return Err(FxError::MissingCurrency);
    }

    let resolved = resolve_rate(catalog, from_currency, to_currency)?;
    let rate = resolved.rate();
    let out_of_range = || FxError::AmountOutOfRange(amount);

    let (send_amount, receive_amount) = match direction {
        Direction::Receive => (amount.checked_div(rate).ok_or_else(out_of_range)?, amount),
        Direction::Send => (amount, amount.checked_mul(rate).ok_or_else(out_of_range)?),
    };

    let fee_amount = calculate_fee(send_amount, &resolved)?;
    let total_amount = send_amount
        .checked_add(fee_amount)
        .ok_or_else(out_of_range)?;

    debug!(
        %direction,
        from = from_currency,
        to = to_currency,
        rate_kind = ?resolved.kind(),
        %rate,
        "Calculated order amounts"
    );

    Ok(OrderAmounts {
        send_amount: round_cents(send_amount),
        receive_amount: round_cents(receive_amount),
        exchange_rate: rate,
        fee_amount: round_cents(fee_amount),
        fee_type: resolved.fee_policy().fee_type,
        total_amount: round_cents(total_amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use easner_common::CENT_PLACES;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn usd_ngn(fee_type: FeeType, fee_amount: Decimal) -> Vec<ExchangeRate> {
        vec![ExchangeRate::new("USD", "NGN", dec!(1500)).with_fee(fee_type, fee_amount)]
    }

    #[test]
    fn test_send_usd_to_ngn() {
        let catalog = usd_ngn(FeeType::Fixed, dec!(5));

        let amounts =
            calculate_order_amounts(Direction::Send, dec!(200), "USD", "NGN", &catalog).unwrap();

        assert_eq!(
            amounts,
            OrderAmounts {
                send_amount: dec!(200.00),
                receive_amount: dec!(300000.00),
                exchange_rate: dec!(1500),
                fee_amount: dec!(5.00),
                fee_type: FeeType::Fixed,
                total_amount: dec!(205.00),
            }
        );
    }

    #[test]
    fn test_inverted_rate_keeps_fixed_fee() {
        let catalog = usd_ngn(FeeType::Fixed, dec!(2));

        let amounts =
            calculate_order_amounts(Direction::Send, dec!(100), "NGN", "USD", &catalog).unwrap();

        assert_eq!(amounts.exchange_rate, Decimal::ONE / dec!(1500));
        assert_eq!(amounts.send_amount, dec!(100));
        assert_eq!(amounts.receive_amount, dec!(0.07));
        assert_eq!(amounts.fee_type, FeeType::Fixed);
        assert_eq!(amounts.fee_amount, dec!(2));
        assert_eq!(amounts.total_amount, dec!(102));
    }

    #[test]
    fn test_fee_on_send_side() {
        let catalog = vec![
            ExchangeRate::new("USD", "EUR", dec!(2)).with_fee(FeeType::Percentage, dec!(10)),
        ];

        let amounts =
            calculate_order_amounts(Direction::Send, dec!(100), "USD", "EUR", &catalog).unwrap();

        assert_eq!(amounts.receive_amount, dec!(200));
        assert_eq!(amounts.fee_amount, dec!(10.00));
        assert_eq!(amounts.total_amount, dec!(110.00));
    }

    #[test]
    fn test_receive_direction_fee_on_derived_send_amount() {
        let catalog = vec![
            ExchangeRate::new("USD", "EUR", dec!(2)).with_fee(FeeType::Percentage, dec!(10)),
        ];

        let amounts =
            calculate_order_amounts(Direction::Receive, dec!(200), "USD", "EUR", &catalog)
                .unwrap();

        assert_eq!(amounts.send_amount, dec!(100));
        assert_eq!(amounts.receive_amount, dec!(200));
        assert_eq!(amounts.fee_amount, dec!(10));
        assert_eq!(amounts.total_amount, dec!(110));
    }

    #[test]
    fn test_rounding_happens_last() {
        // send = 3.3333.., fee = 0.3333.., total = 3.6666..
        // Rounding send first would give 3.33 + 0.333 = 3.66.
        let catalog = vec![
            ExchangeRate::new("USD", "GHS", dec!(3)).with_fee(FeeType::Percentage, dec!(10)),
        ];

        let amounts =
            calculate_order_amounts(Direction::Receive, dec!(10), "USD", "GHS", &catalog)
                .unwrap();

        assert_eq!(amounts.send_amount, dec!(3.33));
        assert_eq!(amounts.fee_amount, dec!(0.33));
        assert_eq!(amounts.total_amount, dec!(3.67));
    }

    #[test]
    fn test_same_currency_is_free() {
        let amounts =
            calculate_order_amounts(Direction::Send, dec!(42.5), "USD", "USD", &[]).unwrap();

        assert_eq!(amounts.exchange_rate, Decimal::ONE);
        assert_eq!(amounts.receive_amount, dec!(42.5));
        assert_eq!(amounts.fee_type, FeeType::Free);
        assert_eq!(amounts.fee_amount, Decimal::ZERO);
        assert_eq!(amounts.total_amount, dec!(42.5));
    }

    #[test]
    fn test_invalid_amount() {
        let catalog = usd_ngn(FeeType::Free, dec!(0));

        for amount in [dec!(0), dec!(-1)] {
            let result = calculate_order_amounts(Direction::Send, amount, "USD", "NGN", &catalog);
            assert!(matches!(result, Err(FxError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_invalid_amount_checked_before_currency() {
        let result = calculate_order_amounts(Direction::Send, dec!(0), "", "", &[]);
        assert!(matches!(result, Err(FxError::InvalidAmount(_))));
    }

    #[test]
    fn test_missing_currency() {
        let catalog = usd_ngn(FeeType::Free, dec!(0));

        for (from, to) in [("", "NGN"), ("USD", ""), ("  ", "NGN")] {
            let result = calculate_order_amounts(Direction::Send, dec!(10), from, to, &catalog);
            assert!(matches!(result, Err(FxError::MissingCurrency)));
        }
    }

    #[test]
    fn test_missing_rate_is_hard_failure() {
        let result = calculate_order_amounts(Direction::Send, dec!(50), "XYZ", "ABC", &[]);

        match result {
            Err(FxError::RateNotFound { from, to }) => {
                assert_eq!(from, "XYZ");
                assert_eq!(to, "ABC");
            }
            other => panic!("expected RateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_direct_rate_does_not_panic() {
        let catalog = vec![ExchangeRate::new("USD", "NGN", dec!(0))];

        let result = calculate_order_amounts(Direction::Receive, dec!(10), "USD", "NGN", &catalog);

        assert!(matches!(result, Err(FxError::AmountOutOfRange(_))));
    }

    #[test]
    fn test_request_calculate() {
        let catalog = usd_ngn(FeeType::Fixed, dec!(5));

        let amounts = OrderRequest::receive(dec!(300000), "USD", "NGN")
            .calculate(&catalog)
            .unwrap();

        assert_eq!(amounts.send_amount, dec!(200));
        assert_eq!(amounts.total_amount, dec!(205));
    }

    #[test]
    fn test_amounts_serialize_camel_case() {
        let catalog = usd_ngn(FeeType::Fixed, dec!(5));
        let amounts = OrderRequest::send(dec!(200), "USD", "NGN")
            .calculate(&catalog)
            .unwrap();

        let json = serde_json::to_value(&amounts).unwrap();

        assert!(json.get("sendAmount").is_some());
        assert!(json.get("totalAmount").is_some());
        assert_eq!(json["feeType"], "fixed");
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    fn rates() -> impl Strategy<Value = Decimal> {
        prop_oneof![
            Just(dec!(1500)),
            Just(dec!(0.92)),
            Just(dec!(1.0837)),
            Just(dec!(0.000666)),
            Just(dec!(12.5)),
        ]
    }

    proptest! {
        #[test]
        fn prop_direction_round_trip(amount in cents(), rate in rates()) {
            let catalog = vec![ExchangeRate::new("AAA", "BBB", rate)];

            let sent = calculate_order_amounts(Direction::Send, amount, "AAA", "BBB", &catalog).unwrap();
            prop_assert!((sent.receive_amount - amount * rate).abs() <= dec!(0.01));

            let received =
                calculate_order_amounts(Direction::Receive, amount * rate, "AAA", "BBB", &catalog).unwrap();
            prop_assert!((received.send_amount - amount).abs() <= dec!(0.01));
        }

        #[test]
        fn prop_outputs_have_at_most_two_decimals(
            amount in cents(),
            rate in rates(),
            fee in (0i64..10_000).prop_map(|c| Decimal::new(c, 2)),
            receive in any::<bool>(),
        ) {
            let catalog = vec![
                ExchangeRate::new("AAA", "BBB", rate).with_fee(FeeType::Percentage, fee),
            ];
            let direction = if receive { Direction::Receive } else { Direction::Send };

            let amounts = calculate_order_amounts(direction, amount, "BBB", "AAA", &catalog).unwrap();

            for value in [
                amounts.send_amount,
                amounts.receive_amount,
                amounts.fee_amount,
                amounts.total_amount,
            ] {
                prop_assert!(value.scale() <= CENT_PLACES);
            }
        }
    }
}
