//! Storage contracts for the rate catalog and transaction records.

use async_trait::async_trait;
use dashmap::DashMap;
use easner_common::{Currency, CurrencyPair, TransactionId};
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::rate::ExchangeRate;
use crate::transaction::TransactionRecord;

/// Source of exchange-rate rows.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// All rows with `status = active`.
    async fn active_rates(&self) -> FxResult<Vec<ExchangeRate>>;

    /// The row for an exact directional pair, active or not.
    async fn get_rate(&self, from: &Currency, to: &Currency) -> FxResult<Option<ExchangeRate>>;

    /// Insert or replace the row for the rate's pair.
    async fn upsert_rate(&self, rate: ExchangeRate) -> FxResult<ExchangeRate>;
}

/// Sink for transaction records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new record. Fails if the id already exists.
    async fn insert(&self, record: TransactionRecord) -> FxResult<TransactionRecord>;

    async fn get(&self, id: TransactionId) -> FxResult<Option<TransactionRecord>>;
}

/// Rate store held in memory, keyed by directional pair.
#[derive(Default)]
pub struct InMemoryRateStore {
    rates: DashMap<CurrencyPair, ExchangeRate>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from catalog rows; later rows replace earlier ones.
    pub fn from_rates(rates: impl IntoIterator<Item = ExchangeRate>) -> Self {
        let store = Self::new();
        for rate in rates {
            store.rates.insert(rate.pair(), rate);
        }
        store
    }

    /// Build a store from a JSON array of catalog rows.
    pub fn from_json(json: &str) -> FxResult<Self> {
        let rates: Vec<ExchangeRate> = serde_json::from_str(json)
            .map_err(|e| FxError::Store(format!("invalid rate catalog: {}", e)))?;
        Ok(Self::from_rates(rates))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn active_rates(&self) -> FxResult<Vec<ExchangeRate>> {
        let mut rates: Vec<ExchangeRate> = self
            .rates
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.value().clone())
            .collect();
        rates.sort_by(|a, b| {
            (&a.from_currency, &a.to_currency).cmp(&(&b.from_currency, &b.to_currency))
        });
        Ok(rates)
    }

    async fn get_rate(&self, from: &Currency, to: &Currency) -> FxResult<Option<ExchangeRate>> {
        let pair = CurrencyPair::new(from.clone(), to.clone());
        Ok(self.rates.get(&pair).map(|r| r.value().clone()))
    }

    async fn upsert_rate(&self, rate: ExchangeRate) -> FxResult<ExchangeRate> {
        let pair = rate.pair();
        let mut rate = rate;
        if rate.id.is_empty() {
            rate.id = self
                .rates
                .get(&pair)
                .map(|existing| existing.id.clone())
                .unwrap_or_else(|| format!("rate-{}", pair.to_string().replace('/', "-").to_lowercase()));
        }
        debug!(pair = %pair, rate = %rate.rate, "Upserting rate");
        self.rates.insert(pair, rate.clone());
        Ok(rate)
    }
}

/// Transaction store held in memory.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    records: DashMap<TransactionId, TransactionRecord>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, record: TransactionRecord) -> FxResult<TransactionRecord> {
        use dashmap::mapref::entry::Entry;

        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(FxError::Store(format!(
                "transaction {} already exists",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn get(&self, id: TransactionId) -> FxResult<Option<TransactionRecord>> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }
}
