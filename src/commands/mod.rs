//! CLI command implementations.

pub mod export;
pub mod list;
pub mod menu;
pub mod search;

pub use export::ExportCommand;
pub use list::{ListCommand, ListOptions};
pub use menu::Menu;
pub use search::SearchCommand;

use crate::config::Config;
use crate::shopify::ShopifyClient;
use anyhow::{Context, Result};

/// Builds the HTTP client every command talks through.
pub(crate) fn connect(config: &Config) -> Result<ShopifyClient> {
    ShopifyClient::new(config).context("Failed to create HTTP client")
}
