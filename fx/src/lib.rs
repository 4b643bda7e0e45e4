//! Easner FX Engine
//!
//! Exchange-rate resolution and order quoting for money transfers.
//!
//! # Features
//!
//! - Direct, inverted and same-currency rate resolution over a catalog
//! - Free, fixed and percentage fee policies, always taken on the send side
//! - Send- or receive-fixed quotes rounded to cents exactly once
//! - Caller-owned catalog cache with an injected clock
//!
//! The calculation itself ([`calculate_order_amounts`]) is a pure function
//! of its inputs. A quote is only as fresh as the catalog snapshot it was
//! computed from.
//!
//! # Example
//!
//! ```rust
//! use easner_fx::{calculate_order_amounts, Direction, ExchangeRate, FeeType};
//! use rust_decimal_macros::dec;
//!
//! let catalog = vec![
//!     ExchangeRate::new("USD", "NGN", dec!(1500)).with_fee(FeeType::Fixed, dec!(5)),
//! ];
//!
//! let amounts = calculate_order_amounts(Direction::Send, dec!(200), "USD", "NGN", &catalog)?;
//!
//! assert_eq!(amounts.receive_amount, dec!(300000));
//! assert_eq!(amounts.total_amount, dec!(205));
//! # Ok::<(), easner_fx::FxError>(())
//! ```

pub mod rate;
pub mod resolver;
pub mod fee;
pub mod order;
pub mod cache;
pub mod store;
pub mod transaction;
pub mod service;
pub mod config;
pub mod error;

pub use rate::{ExchangeRate, FeePolicy, FeeType, RateKind, RateStatus, ResolvedRate};
pub use resolver::resolve_rate;
pub use fee::calculate_fee;
pub use order::{calculate_order_amounts, Direction, OrderAmounts, OrderRequest};
pub use cache::{CatalogCache, CatalogCacheConfig, RateCatalog};
pub use store::{InMemoryRateStore, InMemoryTransactionStore, RateStore, TransactionStore};
pub use transaction::{TransactionRecord, TransactionStatus};
pub use service::QuoteService;
pub use config::QuoteConfig;
pub use error::{FxError, FxResult};
