//! Rigshop CLI - Browse the catalog and manage cart, favorites and orders.
//!
//! # Usage
//!
//! ```bash
//! # Save the bearer token issued at sign-in
//! rigshop session set-token eyJhbGciOi...
//!
//! # Browse
//! rigshop products list --category 3 --sort price_asc
//! rigshop products show rtx-4070-super
//!
//! # Cart and checkout
//! rigshop cart add 42 -q 2
//! rigshop checkout --name "Tran Linh" --phone 0912345678 --address "12 Hang Bai" --city Hanoi
//! ```
//!
//! # Commands
//!
//! - `session` - Save, clear or check the session token
//! - `products` / `categories` - Catalog browsing
//! - `cart` - Show and edit the cart
//! - `favorites` - Show and edit favorites
//! - `orders` - Order history, cancel and confirm receipt
//! - `checkout` - Place an order for the cart
//!
//! Pass `--json` to any command for machine-readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use rigshop_core::{CartItemId, CategoryId, OrderId, PaymentMethod, ProductId, ShippingAddress};
use rigshop_storefront::Storefront;
use rigshop_storefront::api::{ProductQuery, ProductSort};
use rigshop_storefront::checkout::CheckoutRequest;
use rigshop_storefront::config::StorefrontConfig;
use rigshop_storefront::session::{FileTokenStore, MemoryTokenStore, TokenStore};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod render;

use commands::Context;
use error::CliError;
use render::Output;

#[derive(Parser)]
#[command(name = "rigshop")]
#[command(author, version, about = "Rigshop storefront from the command line")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the session token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List categories
    Categories,
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show and edit favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Order history and status changes
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum SessionAction {
    /// Save a bearer token for later runs
    SetToken {
        /// Token issued when signing in
        token: String,
    },
    /// Forget the saved token
    Clear,
    /// Check whether the token is still accepted
    Status,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Category id
        #[arg(long)]
        category: Option<CategoryId>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// `newest`, `price_asc`, `price_desc`, `name` or `popular`
        #[arg(long)]
        sort: Option<ProductSort>,
    },
    /// Show one product by id or slug
    Show {
        /// Numeric id or slug
        product: String,
    },
    /// Featured products
    Featured,
    /// Search products by text
    Search {
        query: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change the quantity of a cart line (0 removes it)
    Update {
        item_id: CartItemId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a cart line
    Remove {
        item_id: CartItemId,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Mark a product as a favorite
    Add {
        product_id: ProductId,
    },
    /// Remove a product from favorites
    Remove {
        product_id: ProductId,
    },
    /// Remove every favorite
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List past orders
    History,
    /// Show one order
    Show {
        id: OrderId,
    },
    /// Cancel an order that has not shipped
    Cancel {
        id: OrderId,
    },
    /// Confirm that a shipped order arrived
    Confirm {
        id: OrderId,
    },
}

#[derive(Args)]
struct CheckoutArgs {
    /// Recipient's full name
    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    ward: Option<String>,

    /// `cod`, `bank_transfer` or `card`
    #[arg(long, default_value = "cod", value_parser = parse_payment_method)]
    payment: PaymentMethod,

    #[arg(long)]
    notes: Option<String>,
}

impl From<CheckoutArgs> for CheckoutRequest {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            shipping_address: ShippingAddress {
                full_name: args.name,
                phone: args.phone,
                address: args.address,
                city: args.city,
                district: args.district,
                ward: args.ward,
            },
            payment_method: args.payment,
            notes: args.notes,
        }
    }
}

/// Strict payment method parsing; unknown values are an error here rather
/// than a silent fallback to cash on delivery.
fn parse_payment_method(raw: &str) -> Result<PaymentMethod, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "cod" => Ok(PaymentMethod::Cod),
        "bank_transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
        "card" => Ok(PaymentMethod::Card),
        other => Err(format!(
            "unknown payment method '{other}' (expected cod, bank_transfer, card)"
        )),
    }
}

// =============================================================================
// Startup
// =============================================================================

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
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

/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rigshop_storefront=info,rigshop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// `RIGSHOP_TOKEN` wins over the session file.
fn token_store(config: &StorefrontConfig) -> Result<Arc<dyn TokenStore>, CliError> {
    if let Some(token) = &config.token {
        return Ok(Arc::new(MemoryTokenStore::with_token(token.expose_secret())));
    }
    Ok(Arc::new(FileTokenStore::open(&config.token_file)?))
}

fn report(err: &CliError) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "Error: {err}");
    if let Some(hint) = err.hint() {
        let _ = writeln!(stderr, "{hint}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            report(&err.into());
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "Command failed");
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let tokens = token_store(&config)?;
    let storefront = Storefront::new(&config, tokens)?;
    let ctx = Context {
        output: Output::new(cli.json, config.currency),
        token_from_env: config.token.is_some(),
        storefront,
        config,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let out = &mut out;

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::SetToken { token } => commands::session::set_token(&ctx, out, &token)?,
            SessionAction::Clear => commands::session::clear(&ctx, out)?,
            SessionAction::Status => commands::session::status(&ctx, out).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                limit,
                category,
                brand,
                min_price,
                max_price,
                sort,
            } => {
                let mut query = ProductQuery::new()
                    .page(page)
                    .limit(limit)
                    .price_range(min_price, max_price);
                if let Some(category) = category {
                    query = query.category(category);
                }
                if let Some(brand) = brand {
                    query = query.brand(brand);
                }
                if let Some(sort) = sort {
                    query = query.sort(sort);
                }
                commands::catalog::list(&ctx, out, &query).await?;
            }
            ProductsAction::Show { product } => commands::catalog::show(&ctx, out, &product).await?,
            ProductsAction::Featured => commands::catalog::featured(&ctx, out).await?,
            ProductsAction::Search { query } => commands::catalog::search(&ctx, out, &query).await?,
        },
        Commands::Categories => commands::catalog::categories(&ctx, out).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx, out).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, out, product_id, quantity).await?,
            CartAction::Update { item_id, quantity } => {
                commands::cart::update(&ctx, out, item_id, quantity).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&ctx, out, item_id).await?,
            CartAction::Clear => commands::cart::clear(&ctx, out).await?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&ctx, out).await?,
            FavoritesAction::Add { product_id } => {
                commands::favorites::add(&ctx, out, product_id).await?;
            }
            FavoritesAction::Remove { product_id } => {
                commands::favorites::remove(&ctx, out, product_id).await?;
            }
            FavoritesAction::Clear => commands::favorites::clear(&ctx, out).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::History => commands::orders::history(&ctx, out).await?,
            OrdersAction::Show { id } => commands::orders::show(&ctx, out, id).await?,
            OrdersAction::Cancel { id } => commands::orders::cancel(&ctx, out, id).await?,
            OrdersAction::Confirm { id } => commands::orders::confirm(&ctx, out, id).await?,
        },
        Commands::Checkout(args) => commands::orders::checkout(&ctx, out, args.into()).await?,
    }

    out.flush()?;
    Ok(())
}
