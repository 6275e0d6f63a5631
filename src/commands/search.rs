//! Search command implementation.

use crate::commands::connect;
use crate::config::Config;
use crate::format::Formatter;
use crate::shopify::{search_by_title, CatalogSource, RetryPolicy};
use anyhow::Result;
use tracing::info;

/// Searches product titles across the whole catalog.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, term: &str) -> Result<String> {
        let client = connect(&self.config)?;
        self.execute_with_client(&client, term).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogSource,
        term: &str,
    ) -> Result<String> {
        let pager = search_by_title(client, term, self.config.page_size)?
            .with_retry(RetryPolicy::from_config(&self.config));

        let products = pager.collect_all().await?;

        info!("Found {} products matching '{}'", products.len(), term.trim());

        Ok(Formatter::new(self.config.format).format_products(&products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::ShopError;
    use crate::shopify::{Page, Product};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock catalog with two pages.
    struct MockCatalog {
        call_count: AtomicU32,
    }

    impl MockCatalog {
        fn new() -> Self {
            Self { call_count: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl CatalogSource for MockCatalog {
        async fn fetch_page(&self, cursor: Option<&str>, _limit: u32) -> Result<Page, ShopError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(match cursor {
                None => Page::new(
                    vec![Product::new(11, "Awesome T-Shirt"), Product::new(12, "Cool Sneakers")],
                    Some("page2".to_string()),
                ),
                Some(_) => Page::new(vec![Product::new(13, "Night Shirt")], None),
            })
        }
    }

    fn make_test_config() -> Config {
        let mut config = Config::new();
        config.retry_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_search_command_basic() {
        let client = MockCatalog::new();
        let cmd = SearchCommand::new(make_test_config());

        let output = cmd.execute_with_client(&client, "shirt").await.unwrap();
        assert!(output.contains("Awesome T-Shirt"));
        assert!(output.contains("Night Shirt"));
        assert!(!output.contains("Cool Sneakers"));
        assert_eq!(client.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_command_empty_results() {
        let client = MockCatalog::new();
        let cmd = SearchCommand::new(make_test_config());

        let output = cmd.execute_with_client(&client, "umbrella").await.unwrap();
        assert!(output.contains("No products found"));
    }

    #[tokio::test]
    async fn test_search_command_blank_term() {
        let client = MockCatalog::new();
        let cmd = SearchCommand::new(make_test_config());

        let err = cmd.execute_with_client(&client, "  ").await.unwrap_err();
        assert!(err.to_string().contains("search term"));
        assert_eq!(client.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_command_csv_format() {
        let client = MockCatalog::new();
        let mut config = make_test_config();
        config.format = OutputFormat::Csv;

        let cmd = SearchCommand::new(config);
        let output = cmd.execute_with_client(&client, "SNEAKERS").await.unwrap();
        assert!(output.starts_with("id,title"));
        assert!(output.contains("12,Cool Sneakers"));
    }
}
