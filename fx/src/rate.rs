//! Exchange-rate catalog rows and resolved rates.

use chrono::{DateTime, Utc};
use easner_common::{Currency, CurrencyPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FxError, FxResult};

/// How a corridor charges for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    /// No fee.
    Free,
    /// A flat charge in the send currency.
    Fixed,
    /// Percentage points of the send amount.
    Percentage,
    /// Anything else found in catalog data. Never charged.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeeType::Free => "free",
            FeeType::Fixed => "fixed",
            FeeType::Percentage => "percentage",
            FeeType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Whether a catalog row may be used for quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateStatus {
    #[default]
    Active,
    Inactive,
}

/// The fee half of a rate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub fee_type: FeeType,
    pub fee_amount: Decimal,
}

impl FeePolicy {
    pub fn new(fee_type: FeeType, fee_amount: Decimal) -> Self {
        Self { fee_type, fee_amount }
    }

    /// The policy of a same-currency transfer.
    pub fn free() -> Self {
        Self::new(FeeType::Free, Decimal::ZERO)
    }
}

/// A directional rate row as stored in the catalog.
///
/// `rate` is the amount of `to_currency` paid per unit of `from_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Row identifier in the backing store.
    #[serde(default)]
    pub id: String,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub rate: Decimal,
    pub fee_type: FeeType,
    #[serde(default)]
    pub fee_amount: Decimal,
    #[serde(default)]
    pub status: RateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExchangeRate {
    /// Create an active rate row without a fee.
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>, rate: Decimal) -> Self {
        Self {
            id: String::new(),
            from_currency: from.into(),
            to_currency: to.into(),
            rate,
            fee_type: FeeType::Free,
            fee_amount: Decimal::ZERO,
            status: RateStatus::Active,
            updated_at: None,
        }
    }

    /// Attach a fee policy.
    pub fn with_fee(mut self, fee_type: FeeType, fee_amount: Decimal) -> Self {
        self.fee_type = fee_type;
        self.fee_amount = fee_amount;
        self
    }

    /// Set the row status.
    pub fn with_status(mut self, status: RateStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the row identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from_currency.clone(), self.to_currency.clone())
    }

    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy::new(self.fee_type, self.fee_amount)
    }

    pub fn is_active(&self) -> bool {
        self.status == RateStatus::Active
    }

    /// Check the row before it is written to the catalog.
    pub fn validate(&self) -> FxResult<()> {
        let invalid = |reason: &str| FxError::InvalidRate {
            pair: self.pair(),
            reason: reason.to_string(),
        };

        if self.from_currency.is_empty() || self.to_currency.is_empty() {
            return Err(invalid("currency codes are required"));
        }
        if !self.from_currency.is_well_formed() || !self.to_currency.is_well_formed() {
            return Err(invalid("currency codes must be three letters"));
        }
        if self.from_currency == self.to_currency {
            return Err(invalid("same-currency rates are implicit"));
        }
        if self.rate <= Decimal::ZERO {
            return Err(invalid("rate must be positive"));
        }
        if self.fee_amount < Decimal::ZERO {
            return Err(invalid("fee amount cannot be negative"));
        }
        if self.fee_type == FeeType::Percentage && self.fee_amount > Decimal::ONE_HUNDRED {
            return Err(invalid("percentage fee cannot exceed 100"));
        }
        if self.fee_type == FeeType::Unknown {
            return Err(invalid("unrecognized fee type"));
        }

        Ok(())
    }
}

/// Which branch of the resolver produced a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    Identity,
    Stored,
    Inverted,
}

/// The rate selected for a quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedRate<'a> {
    /// Same-currency conversion: rate 1, never charged.
    Identity,
    /// A catalog row matching the requested direction.
    Stored(&'a ExchangeRate),
    /// The reverse row, inverted. Fees stay those of `original`.
    Inverted {
        original: &'a ExchangeRate,
        effective_rate: Decimal,
    },
}

impl ResolvedRate<'_> {
    /// Amount of the receive currency per unit of the send currency.
    pub fn rate(&self) -> Decimal {
        match self {
            ResolvedRate::Identity => Decimal::ONE,
            ResolvedRate::Stored(row) => row.rate,
            ResolvedRate::Inverted { effective_rate, .. } => *effective_rate,
        }
    }

    pub fn fee_policy(&self) -> FeePolicy {
        match self {
            ResolvedRate::Identity => FeePolicy::free(),
            ResolvedRate::Stored(row) => row.fee_policy(),
            ResolvedRate::Inverted { original, .. } => original.fee_policy(),
        }
    }

    pub fn kind(&self) -> RateKind {
        match self {
            ResolvedRate::Identity => RateKind::Identity,
            ResolvedRate::Stored(_) => RateKind::Stored,
            ResolvedRate::Inverted { .. } => RateKind::Inverted,
        }
    }
}
