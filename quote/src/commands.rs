//! Command-line arguments and command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use easner_common::{Actor, ApiError, ErrorBody, RecipientId};
use easner_fx::{
    Direction, InMemoryRateStore, InMemoryTransactionStore, OrderRequest, QuoteConfig,
    QuoteService,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Easner quoting CLI
#[derive(Parser, Debug)]
#[command(name = "easner-quote")]
#[command(about = "Quote transfers against an exchange-rate catalog")]
pub struct Args {
    /// Path to a JSON array of exchange-rate rows
    #[arg(short, long, env = "EASNER_RATE_CATALOG")]
    pub catalog: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Quote a transfer
    Quote(OrderArgs),
    /// Quote a transfer and record it
    Transfer(TransferArgs),
    /// List active rates
    Rates,
}

/// Which side of the transfer the amount fixes.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Send,
    Receive,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Send => Direction::Send,
            DirectionArg::Receive => Direction::Receive,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct OrderArgs {
    /// Amount, in the send or receive currency depending on direction
    #[arg(short, long)]
    pub amount: Decimal,

    /// Currency being sent
    #[arg(long)]
    pub from: String,

    /// Currency being received
    #[arg(long)]
    pub to: String,

    /// Whether the amount is what is sent or what is received
    #[arg(short, long, value_enum, default_value = "send")]
    pub direction: DirectionArg,
}

impl OrderArgs {
    fn to_request(&self) -> OrderRequest {
        OrderRequest {
            direction: self.direction.into(),
            amount: self.amount,
            from_currency: self.from.clone(),
            to_currency: self.to.clone(),
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TransferArgs {
    /// Sending user
    #[arg(long)]
    pub user: String,

    /// Saved recipient
    #[arg(long)]
    pub recipient: String,

    #[command(flatten)]
    pub order: OrderArgs,
}

/// Rejection printed to stderr.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    #[serde(flatten)]
    pub error: ErrorBody,
}

impl<E: ApiError> From<E> for ErrorResponse {
    fn from(error: E) -> Self {
        Self {
            status: error.status_code(),
            error: error.to_body(),
        }
    }
}

impl ErrorResponse {
    /// Failure on our side rather than in the request.
    pub fn internal(error: anyhow::Error) -> Self {
        Self {
            status: 500,
            error: ErrorBody::new("INTERNAL_ERROR", format!("{:#}", error)),
        }
    }
}

pub type CommandResult = Result<Value, ErrorResponse>;

/// Build a quote service over the catalog file.
pub fn load_service(catalog: &Path, config: QuoteConfig) -> anyhow::Result<QuoteService> {
    let json = std::fs::read_to_string(catalog)
        .with_context(|| format!("reading rate catalog {}", catalog.display()))?;
    let rates = InMemoryRateStore::from_json(&json)?;

    info!(rates = rates.len(), "Loaded rate catalog");

    Ok(QuoteService::new(
        Arc::new(rates),
        Arc::new(InMemoryTransactionStore::new()),
        config,
    ))
}

pub async fn quote(service: &QuoteService, args: &OrderArgs) -> CommandResult {
    let amounts = service.quote(&args.to_request()).await?;
    to_value(&amounts).map_err(ErrorResponse::internal)
}

pub async fn transfer(service: &QuoteService, args: &TransferArgs) -> CommandResult {
    let actor = Actor::user(args.user.clone());
    let record = service
        .create_transaction(
            &actor,
            RecipientId::new(args.recipient.clone()),
            &args.order.to_request(),
        )
        .await?;
    to_value(&record).map_err(ErrorResponse::internal)
}

pub async fn rates(service: &QuoteService) -> CommandResult {
    let catalog = service.catalog().await?;
    to_value(catalog.rates()).map_err(ErrorResponse::internal)
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<Value> {
    let value = serde_json::to_value(value).context("serializing command output")?;
    Ok(value)
}
