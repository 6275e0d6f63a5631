//! Export command: fetch the whole catalog and write it to a JSON file.

use crate::commands::connect;
use crate::config::Config;
use crate::export::{export_json, ExportOutcome};
use crate::shopify::{fetch_all, CatalogSource, RetryPolicy};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Exports every product to a JSON file.
pub struct ExportCommand {
    config: Config,
}

impl ExportCommand {
    /// Creates a new export command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches all products and writes them to `path` (or the configured default).
    pub async fn execute(&self, path: Option<&Path>) -> Result<ExportOutcome> {
        let client = connect(&self.config)?;
        self.execute_with_client(&client, path).await
    }

    /// Executes the export with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogSource,
        path: Option<&Path>,
    ) -> Result<ExportOutcome> {
        let path = path.unwrap_or(self.config.export_path.as_path());
        info!("Fetching all products for export");

        let products = fetch_all(client, self.config.page_size)
            .with_retry(RetryPolicy::from_config(&self.config))
            .collect_all()
            .await?;

        export_json(&products, path)
    }
}
