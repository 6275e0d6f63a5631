//! shopify-fetch - Fetch, search and export Shopify product catalogs
//!
//! Talks to the Shopify Admin REST API, follows `Link` header cursors
//! across pages, and renders or exports the resulting product records.

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod format;
pub mod shopify;

pub use config::{Config, Credentials};
pub use error::ShopError;
pub use shopify::{CatalogSource, Page, Product, ProductPager, ProductStatus, ShopifyClient};
