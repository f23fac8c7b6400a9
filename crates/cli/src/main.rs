//! Shopfront CLI - checkout and order history from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the signed-in shopper's cart
//! shopfront cart
//!
//! # Check out (prints the hosted payment page URL)
//! shopfront checkout --full-name "Asha Rao" --country India \
//!     --street-address-line1 "12 MG Road" --street-address-line2 "Indiranagar" \
//!     --city Bengaluru --state Karnataka --zip-code 560001 \
//!     --phone-number 9876543210 --email asha@example.com
//!
//! # List orders, then open one
//! shopfront orders list
//! shopfront orders show 6660aa01
//!
//! # Upload a product image
//! shopfront upload /api/upload ./saffron.png
//! ```
//!
//! Configuration comes from the environment (see `shopfront_client::config`).
//! The signed-in user and token are read from the session file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_client::AppState;
use shopfront_client::config::ClientConfig;
use shopfront_client::notify::{Notifier, TracingNotifier};
use shopfront_client::widget::{HostedCheckout, PaymentWidget};
use shopfront_core::BillingForm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront checkout and order history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in shopper's cart
    Cart,
    /// Validate billing details and start payment
    Checkout(BillingArgs),
    /// Browse order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Upload a file to an authenticated endpoint
    Upload {
        /// API path to upload to (e.g. `/api/upload`)
        path: String,

        /// File to send
        file: PathBuf,

        /// Multipart field name
        #[arg(long, default_value = "image")]
        field: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List the signed-in shopper's orders
    List,
    /// Show the products of one order
    Show {
        /// Order document id (first column of `orders list`)
        order_id: String,
    },
}

/// Billing details. Every field is required; missing ones are reported by
/// checkout, first one first.
#[derive(Args)]
struct BillingArgs {
    #[arg(long, default_value = "")]
    full_name: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    street_address_line1: String,
    #[arg(long, default_value = "")]
    street_address_line2: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    zip_code: String,
    #[arg(long, default_value = "")]
    phone_number: String,
    #[arg(long, default_value = "")]
    email: String,
}

impl From<BillingArgs> for BillingForm {
    fn from(args: BillingArgs) -> Self {
        Self {
            full_name: args.full_name,
            country: args.country,
            street_address_line1: args.street_address_line1,
            street_address_line2: args.street_address_line2,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            phone_number: args.phone_number,
            email: args.email,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_client=info,shopfront_cli=info".into());

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let notifier = TracingNotifier;

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            notifier.notify(&shopfront_client::Error::from(e).alert());
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_internal() {
                let event_id = sentry::capture_error(&e);
                tracing::debug!(error = %e, sentry_event_id = %event_id, "Command failed");
            }
            notifier.notify(&e.alert());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> shopfront_client::Result<()> {
    let widget = config.checkout_url.clone().map(|url| {
        let widget: Arc<dyn PaymentWidget> = Arc::new(HostedCheckout::new(url, std::io::stdout()));
        widget
    });
    let state = AppState::new(config, widget)?;

    match cli.command {
        Commands::Cart => commands::cart::show(&state).await,
        Commands::Checkout(billing) => commands::checkout::submit(&state, billing.into()).await,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&state).await,
            OrdersAction::Show { order_id } => commands::orders::show(&state, &order_id).await,
        },
        Commands::Upload { path, file, field } => {
            commands::upload::send(&state, &path, &file, &field).await
        }
    }
}
