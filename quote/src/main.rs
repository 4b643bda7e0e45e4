//! Easner Quote
//!
//! Quotes transfers against a rate catalog exported as JSON.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easner_fx::QuoteConfig;

mod commands;

use commands::{Args, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = QuoteConfig::from_env();
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    // Initialize logging; output goes to stderr so stdout stays JSON.
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    debug!(catalog = %args.catalog.display(), "Starting Easner Quote");

    let service = commands::load_service(&args.catalog, config)?;
    let output = match &args.command {
        Command::Quote(order) => commands::quote(&service, order).await,
        Command::Transfer(transfer) => commands::transfer(&service, transfer).await,
        Command::Rates => commands::rates(&service).await,
    };

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(body) => {
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
    }
}
