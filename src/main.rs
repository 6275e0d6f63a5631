//! shopify-fetch - Fetch, search and export Shopify product catalogs

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shopify_fetch::commands::menu::FIRST_PAGE_LIMIT;
use shopify_fetch::commands::{ExportCommand, ListCommand, ListOptions, Menu, SearchCommand};
use shopify_fetch::config::{Config, OutputFormat, StatusFilter};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shopify-fetch",
    version,
    about = "Fetch, search and export Shopify product catalogs",
    long_about = "Reads products from the Shopify Admin REST API, following pagination cursors, \
                  and prints them as a table or exports them to JSON. Runs an interactive menu \
                  when no subcommand is given."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Product status to fetch (active, draft, archived, any)
    #[arg(short, long, global = true)]
    status: Option<StatusFilter>,

    /// Records per page request (max 250)
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first page of products
    #[command(alias = "l")]
    List {
        /// Number of products to show
        #[arg(short, long, default_value_t = FIRST_PAGE_LIMIT)]
        limit: u32,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show every product in the store
    #[command(alias = "a")]
    All {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Search products by title (case-insensitive)
    #[command(alias = "s")]
    Search {
        /// Text the title must contain
        term: String,
    },

    /// Export every product to a JSON file
    #[command(alias = "e")]
    Export {
        /// Output file (defaults to shopify_products.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive menu (default)
    Menu,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Leave out products whose title contains any of these (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Minimum first-variant price
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum first-variant price
    #[arg(long)]
    max_price: Option<Decimal>,
}

impl From<FilterArgs> for ListOptions {
    fn from(args: FilterArgs) -> Self {
        Self {
            exclude: args.exclude.unwrap_or_default(),
            min_price: args.min_price,
            max_price: args.max_price,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // .env values land in the process environment before the env layer is read
    dotenvy::dotenv().ok();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(status) = cli.status {
        config.status = status;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::List { limit, filters } => {
            let cmd = ListCommand::new(config).with_options(filters.into());
            let output = cmd.first_page(limit).await?;
            println!("{}", output);
        }

        Commands::All { filters } => {
            let cmd = ListCommand::new(config).with_options(filters.into());
            let output = cmd.all().await?;
            println!("{}", output);
        }

        Commands::Search { term } => {
            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&term).await?;
            println!("{}", output);
        }

        Commands::Export { output } => {
            let cmd = ExportCommand::new(config);
            let outcome = cmd.execute(output.as_deref()).await?;
            println!("{}", outcome);
        }

        Commands::Menu => {
            Menu::new(config).run().await?;
        }
    }

    Ok(())
}
