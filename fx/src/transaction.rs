//! Transaction records built from quotes.

use easner_common::{Currency, RecipientId, Timestamp, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::{Direction, OrderAmounts};
use crate::rate::FeeType;

/// Lifecycle state of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded, awaiting the sender's funds.
    Pending,
    /// Funds received, payout in flight.
    Processing,
    /// Recipient paid.
    Completed,
    /// Payout failed.
    Failed,
    /// Cancelled before processing.
    Cancelled,
}

impl TransactionStatus {
    /// Check if this is a final state.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Failed | TransactionStatus::Cancelled
        )
    }

    /// Get valid next states from current state.
    pub fn valid_transitions(&self) -> &[TransactionStatus] {
        match self {
            TransactionStatus::Pending => {
                &[TransactionStatus::Processing, TransactionStatus::Cancelled]
            }
            TransactionStatus::Processing => {
                &[TransactionStatus::Completed, TransactionStatus::Failed]
            }
            TransactionStatus::Completed
            | TransactionStatus::Failed
            | TransactionStatus::Cancelled => &[],
        }
    }

    /// Check if transition to given state is valid.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

/// The stored record of a transfer.
///
/// Amount fields are copied verbatim from the quote; once written, the
/// record (not a recalculation) is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub user_id: UserId,
    pub recipient_id: RecipientId,
    pub direction: Direction,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub send_amount: Decimal,
    pub receive_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub fee_type: FeeType,
    pub total_amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TransactionRecord {
    /// Create a pending record from a computed quote.
    pub fn from_quote(
        user_id: UserId,
        recipient_id: RecipientId,
        direction: Direction,
        from_currency: Currency,
        to_currency: Currency,
        amounts: &OrderAmounts,
        now: Timestamp,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            recipient_id,
            direction,
            from_currency,
            to_currency,
            send_amount: amounts.send_amount,
            receive_amount: amounts.receive_amount,
            exchange_rate: amounts.exchange_rate,
            fee_amount: amounts.fee_amount,
            fee_type: amounts.fee_type,
            total_amount: amounts.total_amount,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The amounts this record was created from.
    pub fn amounts(&self) -> OrderAmounts {
        OrderAmounts {
            send_amount: self.send_amount,
            receive_amount: self.receive_amount,
            exchange_rate: self.exchange_rate,
            fee_amount: self.fee_amount,
            fee_type: self.fee_type,
            total_amount: self.total_amount,
        }
    }
}
