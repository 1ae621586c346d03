//! Vitrine CLI - Terminal storefront.
//!
//! Drives the storefront library against file-backed storage in
//! `VITRINE_DATA_DIR`, so the cart, session and orders survive between runs
//! and are shared with the server binary when both point at one directory.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! vitrine products --category electronics --sort price-asc
//! vitrine product 3
//!
//! # Manage the cart
//! vitrine cart add 3 -q 2
//! vitrine cart update 3 1
//! vitrine cart show
//!
//! # Sign in and check out
//! vitrine login -u johnd -p 'm38rmF$'
//! vitrine checkout --form order.json
//! vitrine orders
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use vitrine_core::{OrderId, ProductFilters, ProductId, SortBy};
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::state::AppState;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,

        /// `price-asc`, `price-desc`, `name-asc`, `name-desc` or `rating`
        #[arg(long)]
        sort: Option<SortBy>,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,
    },
    /// Show one product
    Product { id: ProductId },
    /// List categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Look up an address by CEP
    Address { cep: String },
    /// Sign in
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Place an order from the cart (requires login)
    Checkout {
        /// JSON file with the checkout form
        #[arg(short, long)]
        form: PathBuf,
    },
    /// Show placed orders (requires login)
    Orders {
        #[arg(long)]
        id: Option<OrderId>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Set the quantity of a product; zero or below removes it
    Update {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Products {
            category,
            search,
            sort,
            min_price,
            max_price,
        } => {
            let filters = ProductFilters {
                category,
                search,
                sort_by: sort,
                min_price,
                max_price,
            };
            commands::catalog::products(&state, &filters).await?;
        }
        Commands::Product { id } => commands::catalog::product(&state, id).await?,
        Commands::Categories => commands::catalog::categories(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, quantity } => {
                commands::cart::add(&state, id, quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&state, id),
            CartAction::Update { id, quantity } => commands::cart::update(&state, id, quantity),
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Address { cep } => commands::catalog::address(&state, &cep).await?,
        Commands::Login { username, password } => {
            commands::account::login(&state, username, password).await?;
        }
        Commands::Logout => commands::account::logout(&state)?,
        Commands::Checkout { form } => commands::orders::checkout(&state, &form)?,
        Commands::Orders { id } => commands::orders::list(&state, id)?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_product_filters() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "products",
            "--category",
            "electronics",
            "--sort",
            "price-desc",
            "--max-price",
            "100.50",
        ])
        .unwrap();

        let Commands::Products {
            category,
            sort,
            max_price,
            min_price,
            ..
        } = cli.command
        else {
            panic!("expected products command");
        };
        assert_eq!(category.as_deref(), Some("electronics"));
        assert_eq!(sort, Some(SortBy::PriceDesc));
        assert_eq!(max_price, Some(Decimal::new(10050, 2)));
        assert!(min_price.is_none());
    }

    #[test]
    fn test_parse_cart_update_accepts_negative_quantity() {
        let cli = Cli::try_parse_from(["vitrine", "cart", "update", "3", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Update { quantity: -1, .. }
            }
        ));
    }

    #[test]
    fn test_parse_cart_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["vitrine", "cart", "add", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 1, .. }
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["vitrine", "products", "--sort", "cheapest"]).is_err());
    }
}
