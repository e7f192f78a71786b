//! Breeze CLI - terminal client for the Breeze storefront.
//!
//! Each invocation behaves like one page load of the storefront: the
//! profile's cart, compare list and favorites are hydrated from disk, the
//! command runs, and any change is written back before exit.
//!
//! # Usage
//!
//! ```bash
//! # Browse an offline catalog
//! breeze --catalog products.json products list
//!
//! # Add two units to the cart and show it
//! breeze --catalog products.json cart add split-18k --quantity 2
//! breeze cart show
//!
//! # Compare products side by side
//! breeze --catalog products.json compare add split-18k
//! breeze --catalog products.json compare add window-12k
//!
//! # Place the order (requires BACKEND_URL and BACKEND_ANON_KEY)
//! breeze order submit --name "Noura" --phone 0551234567 --city Riyadh --address "King Fahd Rd 12"
//! ```
//!
//! # Commands
//!
//! - `products list` - List the catalog
//! - `cart` - Add, set, remove, clear and show cart entries
//! - `compare` - Manage the comparison list (up to 4 products)
//! - `favorites` - Manage favorites
//! - `order submit` - Send the cart as an order and clear it
//!
//! Set `RUST_LOG` to adjust log levels and `BREEZE_LOG_JSON=1` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use breeze_core::Locale;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "breeze")]
#[command(author, version, about = "Breeze storefront client")]
struct Cli {
    /// Read products from a JSON file instead of the backend
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Profile directory (overrides `BREEZE_PROFILE_DIR`)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Display language, `ar` or `en` (overrides `BREEZE_LOCALE`)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the comparison list
    Compare {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Place orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add units of a product
    Add {
        /// Product id
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart entry (zero or less removes it)
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show cart contents and totals
    Show,
}

#[derive(Subcommand)]
enum ListAction {
    /// Add a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },
    /// Remove every product
    Clear,
    /// Show the list
    Show,
}

#[derive(Subcommand)]
enum FavoritesAction {
    #[command(flatten)]
    List(ListAction),
    /// Add a product if absent, remove it otherwise
    Toggle {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Send every cart entry as an order
    Submit {
        /// Buyer's full name
        #[arg(short, long)]
        name: String,

        /// Buyer's phone number
        #[arg(short, long)]
        phone: String,

        /// Buyer's email address
        #[arg(short, long)]
        email: Option<String>,

        /// Delivery city
        #[arg(short, long)]
        city: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Notes for the store
        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "breeze_storefront=info,breeze_cli=info".into());

    // JSON lines when BREEZE_LOG_JSON is set, text otherwise. Logs go to
    // stderr so command output stays clean.
    let json = std::env::var_os("BREEZE_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> breeze_storefront::Result<()> {
    let ctx = Context::load(cli.catalog.as_deref(), cli.profile, cli.locale)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&ctx).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, quantity } => commands::cart::add(&ctx, &id, quantity).await?,
            CartAction::Set { id, quantity } => commands::cart::set(&ctx, &id, quantity),
            CartAction::Remove { id } => commands::cart::remove(&ctx, &id),
            CartAction::Clear => commands::cart::clear(&ctx),
            CartAction::Show => commands::cart::show(&ctx),
        },
        Commands::Compare { action } => match action {
            ListAction::Add { id } => commands::compare::add(&ctx, &id).await?,
            ListAction::Remove { id } => commands::compare::remove(&ctx, &id),
            ListAction::Clear => commands::compare::clear(&ctx),
            ListAction::Show => commands::compare::show(&ctx),
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List(ListAction::Add { id }) => {
                commands::favorites::add(&ctx, &id).await?;
            }
            FavoritesAction::List(ListAction::Remove { id }) => {
                commands::favorites::remove(&ctx, &id);
            }
            FavoritesAction::List(ListAction::Clear) => commands::favorites::clear(&ctx),
            FavoritesAction::List(ListAction::Show) => commands::favorites::show(&ctx),
            FavoritesAction::Toggle { id } => commands::favorites::toggle(&ctx, &id).await?,
        },
        Commands::Order { action } => match action {
            OrderAction::Submit {
                name,
                phone,
                email,
                city,
                address,
                notes,
            } => {
                let form = commands::order::OrderForm {
                    name,
                    phone,
                    email,
                    city,
                    address,
                    notes,
                };
                commands::order::submit(&ctx, &form).await?;
            }
        },
    }
    Ok(())
}
