//! Storefront CLI - browse the catalog and manage a cart from the terminal.
//!
//! Commands:
//! - `storefront catalog` - Search, filter, sort and page through products
//! - `storefront categories` - Categories with product counts
//! - `storefront cart` - Show and edit the cart
//! - `storefront login` / `register` / `logout` / `whoami` - Session management
//! - `storefront history` - Recent searches
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CartArgs, CatalogArgs, ConfigArgs, HistoryArgs, LoginArgs, RegisterArgs, WhoamiArgs,
};

/// Storefront CLI - browse products and manage your cart
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// List categories with product counts
    Categories,

    /// Show or edit the cart
    Cart(CartArgs),

    /// Sign in
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami(WhoamiArgs),

    /// Recent searches
    History(HistoryArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;
    ctx.output.debug(&format!("api: {}", ctx.config.api.base_url));

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Categories => commands::categories::run(&ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Login(args) => commands::account::login(args, &ctx).await,
        Commands::Register(args) => commands::account::register(args, &ctx).await,
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::Whoami(args) => commands::account::whoami(args, &ctx).await,
        Commands::History(args) => commands::history::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
