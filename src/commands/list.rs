//! Listing commands: the first page, or the whole catalog.

use crate::commands::connect;
use crate::config::Config;
use crate::filters::{FilterChain, FilterChainBuilder};
use crate::format::Formatter;
use crate::shopify::{fetch_all, CatalogSource, RetryPolicy};
use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Client-side filters for listings.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Title terms to leave out
    pub exclude: Vec<String>,
    /// Lowest first-variant price to keep
    pub min_price: Option<Decimal>,
    /// Highest first-variant price to keep
    pub max_price: Option<Decimal>,
}

/// Lists products as formatted output.
pub struct ListCommand {
    config: Config,
    options: ListOptions,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        Self { config, options: ListOptions::default() }
    }

    /// Sets client-side filters.
    pub fn with_options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches only the first page of up to `limit` products.
    pub async fn first_page(&self, limit: u32) -> Result<String> {
        let client = connect(&self.config)?;
        self.first_page_with_client(&client, limit).await
    }

    /// Fetches every page.
    pub async fn all(&self) -> Result<String> {
        let client = connect(&self.config)?;
        self.all_with_client(&client).await
    }

    /// First page with a provided client (for testing).
    pub async fn first_page_with_client(
        &self,
        client: &impl CatalogSource,
        limit: u32,
    ) -> Result<String> {
        info!("Fetching first {} products", limit);

        let mut pager = fetch_all(client, limit)
            .with_retry(RetryPolicy::from_config(&self.config))
            .with_filters(self.filters());

        let products = match pager.next_page().await {
            Some(page) => page?,
            None => Vec::new(),
        };

        info!("Showing {} products", products.len());
        Ok(Formatter::new(self.config.format).format_products(&products))
    }

    /// Every page with a provided client (for testing).
    pub async fn all_with_client(&self, client: &impl CatalogSource) -> Result<String> {
        info!("Fetching all products");

        let products = fetch_all(client, self.config.page_size)
            .with_retry(RetryPolicy::from_config(&self.config))
            .with_filters(self.filters())
            .collect_all()
            .await?;

        info!("Found {} products", products.len());
        Ok(Formatter::new(self.config.format).format_products(&products))
    }

    fn filters(&self) -> FilterChain {
        let filters = FilterChainBuilder::new()
            .exclude_terms(self.options.exclude.clone())
            .price_range(self.options.min_price, self.options.max_price)
            .build();

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }
        filters
    }
}
