//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod history;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args, Default)]
pub struct CatalogArgs {
    /// Search in product names and descriptions.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this category.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Lowest price, in currency units.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Highest price, in currency units.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Hide sold-out products.
    #[arg(long)]
    pub in_stock: bool,

    /// newest, price_asc or price_desc.
    #[arg(long)]
    pub sort: Option<String>,

    /// Page to show (1-based).
    #[arg(short, long)]
    pub page: Option<String>,

    /// Products per page (default: catalog.page_size).
    #[arg(short, long)]
    pub limit: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a product.
    Add {
        /// Product ID.
        id: String,
        /// Units to add.
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=99))]
        quantity: u32,
    },
    /// Set the quantity of a product already in the cart; 0 removes it.
    Set {
        /// Product ID.
        id: String,
        /// New quantity.
        quantity: u32,
    },
    /// Remove a product.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Refresh cart entries from the live catalog.
    Reconcile,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    pub email: String,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Display name (prompted when omitted).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Account email (prompted when omitted).
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for the whoami command.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Ask the server instead of trusting the local session.
    #[arg(long)]
    pub remote: bool,
}

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List recent searches.
    Show,
    /// Forget recent searches.
    Clear,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
