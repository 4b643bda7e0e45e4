//! Quote service: the boundary between request handlers and the engine.

use std::sync::Arc;

use easner_common::{Actor, Clock, Currency, RecipientId, SharedClock, SystemClock};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheStats, CatalogCache, RateCatalog};
use crate::config::QuoteConfig;
use crate::error::{FxError, FxResult};
use crate::order::{OrderAmounts, OrderRequest};
use crate::rate::ExchangeRate;
use crate::store::{RateStore, TransactionStore};
use crate::transaction::TransactionRecord;

/// Loads the rate catalog, quotes transfers and records them.
pub struct QuoteService {
    rates: Arc<dyn RateStore>,
    transactions: Arc<dyn TransactionStore>,
    cache: CatalogCache,
    clock: SharedClock,
    config: QuoteConfig,
}

impl QuoteService {
    /// Create a new quote service on the system clock.
    pub fn new(
        rates: Arc<dyn RateStore>,
        transactions: Arc<dyn TransactionStore>,
        config: QuoteConfig,
    ) -> Self {
        Self::with_clock(rates, transactions, config, Arc::new(SystemClock))
    }

    /// Create a new quote service with an explicit clock.
    pub fn with_clock(
        rates: Arc<dyn RateStore>,
        transactions: Arc<dyn TransactionStore>,
        config: QuoteConfig,
        clock: SharedClock,
    ) -> Self {
        Self {
            rates,
            transactions,
            cache: CatalogCache::with_clock(clock.clone(), config.cache_config()),
            clock,
            config,
        }
    }

    /// Current catalog snapshot, from cache when fresh.
    #[instrument(skip(self))]
    pub async fn catalog(&self) -> FxResult<Arc<RateCatalog>> {
        if self.config.use_cache {
            if let Some(catalog) = self.cache.get() {
                return Ok(catalog);
            }
        }

        let generation = self.cache.generation();
        let rates = self.rates.active_rates().await?;
        debug!(rates = rates.len(), "Fetched rate catalog");

        if self.config.use_cache {
            Ok(self.cache.insert_if_current(rates, generation))
        } else {
            Ok(Arc::new(RateCatalog::new(rates, self.clock.now())))
        }
    }

    /// Quote a transfer without recording it.
    #[instrument(skip(self, request), fields(
        direction = %request.direction,
        amount = %request.amount,
        from_currency = %request.from_currency,
        to_currency = %request.to_currency
    ))]
    pub async fn quote(&self, request: &OrderRequest) -> FxResult<OrderAmounts> {
        let request = normalize(request);
        let catalog = self.catalog().await?;

        request.calculate(catalog.rates()).map_err(|e| {
            log_rejection(&e);
            e
        })
    }

    /// Quote a transfer and persist it as a pending transaction.
    ///
    /// Nothing is written unless the quote succeeds.
    #[instrument(skip(self, actor, recipient_id, request), fields(user_id = %actor.user_id, recipient_id = %recipient_id))]
    pub async fn create_transaction(
        &self,
        actor: &Actor,
        recipient_id: RecipientId,
        request: &OrderRequest,
    ) -> FxResult<TransactionRecord> {
        if !recipient_id.is_valid() {
            return Err(FxError::InvalidRecipient(recipient_id.to_string()));
        }

        let request = normalize(request);
        let amounts = self.quote(&request).await?;

        let record = TransactionRecord::from_quote(
            actor.user_id.clone(),
            recipient_id,
            request.direction,
            Currency::new(request.from_currency),
            Currency::new(request.to_currency),
            &amounts,
            self.clock.now(),
        );
        let record = self.transactions.insert(record).await?;

        info!(
            transaction_id = %record.id,
            send_amount = %record.send_amount,
            total_amount = %record.total_amount,
            exchange_rate = %record.exchange_rate,
            "Transaction created"
        );

        Ok(record)
    }

    /// Insert or replace a catalog row. Admin only.
    #[instrument(skip(self, actor, rate), fields(user_id = %actor.user_id, pair = %rate.pair()))]
    pub async fn upsert_rate(&self, actor: &Actor, rate: ExchangeRate) -> FxResult<ExchangeRate> {
        if !actor.is_admin {
            return Err(FxError::Unauthorized(
                "only admins can change exchange rates".to_string(),
            ));
        }

        rate.validate()?;

        let previous = self
            .rates
            .get_rate(&rate.from_currency, &rate.to_currency)
            .await?;
        if let Some(previous) = previous {
            if previous.rate == rate.rate
                && previous.fee_policy() == rate.fee_policy()
                && previous.status == rate.status
            {
                debug!("Exchange rate unchanged, keeping cached catalog");
                return Ok(previous);
            }
            debug!(previous_rate = %previous.rate, "Replacing exchange rate");
        }

        let rate = ExchangeRate {
            updated_at: Some(self.clock.now()),
            ..rate
        };

        let stored = self.rates.upsert_rate(rate).await?;
        self.cache.invalidate();

        info!(rate = %stored.rate, fee_type = %stored.fee_type, "Exchange rate updated");
        Ok(stored)
    }

    /// Get service statistics.
    pub fn stats(&self) -> QuoteServiceStats {
        QuoteServiceStats {
            cache_stats: self.cache.stats(),
        }
    }
}

/// Service statistics.
#[derive(Debug, Clone)]
pub struct QuoteServiceStats {
    pub cache_stats: CacheStats,
}

fn normalize(request: &OrderRequest) -> OrderRequest {
    OrderRequest {
        from_currency: Currency::new(request.from_currency.as_str()).code().to_string(),
        to_currency: Currency::new(request.to_currency.as_str()).code().to_string(),
        ..request.clone()
    }
}

// Rejections are client errors; a missing rate is an operator alert.
fn log_rejection(error: &FxError) {
    match error {
        FxError::RateNotFound { from, to } => {
            warn!(from = %from, to = %to, "No exchange rate configured for pair")
        }
        other => debug!(error = %other, "Quote rejected"),
    }
}
