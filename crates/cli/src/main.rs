//! Qorikusi CLI - browse the catalog and price orders from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, filtered and sorted
//! qk catalog list --search luna --category collares --sort price-asc
//!
//! # Distinct categories in the catalog
//! qk catalog categories
//!
//! # Category records from the admin endpoint (logs in first)
//! qk admin categories -u admin@qorikusi.pe
//!
//! # Order totals for 2 × 180 and 1 × 200
//! qk totals 180x2 200x1
//! ```
//!
//! Configuration comes from the environment (see `StorefrontConfig`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qorikusi_core::CurrencyCode;
use qorikusi_storefront::checkout::{DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "qk")]
#[command(author, version, about = "Qorikusi storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Admin-only endpoints
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Compute order totals for `<PRICE>x<QTY>` line items
    Totals {
        /// Line items, e.g. `180x2 200x1`
        #[arg(required = true)]
        items: Vec<String>,

        /// Subtotal at or above which shipping is free
        #[arg(long, default_value_t = DEFAULT_FREE_SHIPPING_THRESHOLD)]
        free_shipping_threshold: Decimal,

        /// Shipping fee below the threshold
        #[arg(long, default_value_t = DEFAULT_FLAT_SHIPPING_COST)]
        flat_shipping_cost: Decimal,

        /// Display currency (PEN, USD, EUR)
        #[arg(long, default_value = "PEN")]
        currency: CurrencyCode,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products matching the filters
    List(commands::catalog::ListArgs),
    /// List the distinct categories in the catalog
    Categories,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List category records from the admin endpoint
    Categories {
        /// Admin username or email
        #[arg(short, long, env = "QORIKUSI_ADMIN_USER")]
        user: String,

        /// Admin password
        #[arg(short, long, env = "QORIKUSI_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|d| !d.trim().is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(std::env::var("SENTRY_DSN").ok().as_deref());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qorikusi_storefront=info,qorikusi_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.report();
        tracing::error!("Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List(args) => commands::catalog::list(&args).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Categories { user, password } => {
                commands::admin::categories(&user, &password).await?;
            }
        },
        Commands::Totals {
            items,
            free_shipping_threshold,
            flat_shipping_cost,
            currency,
        } => commands::totals::run(
            &items,
            free_shipping_threshold,
            flat_shipping_cost,
            currency,
        )?,
    }
    Ok(())
}
