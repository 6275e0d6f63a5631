//! Interactive menu.

use crate::commands::{connect, ExportCommand, ListCommand, SearchCommand};
use crate::config::Config;
use crate::error::ShopError;
use crate::shopify::ShopifyClient;
use anyhow::{bail, Result};
use dialoguer::{Input, Password, Select};
use std::path::PathBuf;
use tracing::debug;

/// Records shown by the "first products" entry.
pub const FIRST_PAGE_LIMIT: u32 = 50;

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    FirstPage,
    AllProducts,
    Search,
    Export,
    Exit,
}

impl MenuChoice {
    /// Entries in display order.
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::FirstPage,
        MenuChoice::AllProducts,
        MenuChoice::Search,
        MenuChoice::Export,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::FirstPage => "Get first 50 products",
            MenuChoice::AllProducts => "Get all products",
            MenuChoice::Search => "Search products by title",
            MenuChoice::Export => "Export products to JSON",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Maps a `Select` index back to its entry.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Runs the interactive menu until the user picks "Exit".
pub struct Menu {
    config: Config,
}

impl Menu {
    /// Creates a new menu.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Prompts for missing credentials, then loops over the menu.
    ///
    /// Failed actions are reported and the loop continues. Authentication
    /// failures end the session.
    pub async fn run(mut self) -> Result<()> {
        println!("Shopify Products Fetcher");
        println!("{}", "=".repeat(50));

        self.prompt_missing_credentials()?;
        let client = connect(&self.config)?;
        println!("Store: {}", self.config.credentials().shop());

        let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();

        loop {
            println!();
            let index = Select::new().with_prompt("Options").items(&labels).default(0).interact()?;

            let Some(choice) = MenuChoice::from_index(index) else {
                continue;
            };
            debug!("Menu choice: {:?}", choice);

            let outcome = match choice {
                MenuChoice::Exit => {
                    println!("Goodbye!");
                    return Ok(());
                }
                MenuChoice::FirstPage => self.first_page(&client).await,
                MenuChoice::AllProducts => self.all_products(&client).await,
                MenuChoice::Search => self.search(&client).await,
                MenuChoice::Export => self.export(&client).await,
            };

            if let Err(err) = outcome {
                if is_authentication(&err) {
                    return Err(err);
                }
                println!("Error: {:#}", err);
            }
        }
    }

    async fn first_page(&self, client: &ShopifyClient) -> Result<()> {
        println!("Fetching first {} products...", FIRST_PAGE_LIMIT);
        let output = ListCommand::new(self.config.clone())
            .first_page_with_client(client, FIRST_PAGE_LIMIT)
            .await?;
        println!("{}", output);
        Ok(())
    }

    async fn all_products(&self, client: &ShopifyClient) -> Result<()> {
        println!("Fetching all products (this may take a while)...");
        let output = ListCommand::new(self.config.clone()).all_with_client(client).await?;
        println!("{}", output);
        Ok(())
    }

    async fn search(&self, client: &ShopifyClient) -> Result<()> {
        let term: String =
            Input::new().with_prompt("Search term").allow_empty(true).interact_text()?;
        if term.trim().is_empty() {
            println!("Please enter a search term.");
            return Ok(());
        }

        println!("Searching for products matching '{}'...", term.trim());
        let output =
            SearchCommand::new(self.config.clone()).execute_with_client(client, &term).await?;
        println!("{}", output);
        Ok(())
    }

    async fn export(&self, client: &ShopifyClient) -> Result<()> {
        let filename: String = Input::new()
            .with_prompt("Filename")
            .default(self.config.export_path.display().to_string())
            .interact_text()?;

        println!("Fetching all products for export...");
        let path = PathBuf::from(filename.trim());
        let outcome = ExportCommand::new(self.config.clone())
            .execute_with_client(client, Some(path.as_path()))
            .await?;
        println!("{}", outcome);
        Ok(())
    }

    fn prompt_missing_credentials(&mut self) -> Result<()> {
        if self.config.shop.as_deref().map_or(true, |s| s.trim().is_empty()) {
            let shop: String = Input::new()
                .with_prompt("Shop name (without .myshopify.com)")
                .allow_empty(true)
                .interact_text()?;
            self.config.shop = Some(shop.trim().to_string());
        }

        if self.config.access_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            let token = Password::new()
                .with_prompt("Access token")
                .allow_empty_password(true)
                .interact()?;
            self.config.access_token = Some(token.trim().to_string());
        }

        if !self.config.credentials().is_complete() {
            bail!("Shop name and access token are required");
        }
        Ok(())
    }
}

fn is_authentication(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ShopError>().is_some_and(ShopError::is_authentication)
}
