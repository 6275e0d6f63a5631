//! Shopify-specific modules for the HTTP client, pagination, and data models.

pub mod catalog;
pub mod client;
pub mod models;
pub mod pagination;
pub mod retry;

pub use catalog::{fetch_all, search_by_title};
pub use client::{CatalogSource, ShopifyClient, MAX_PAGE_SIZE};
pub use models::{Page, Product, ProductStatus};
pub use pagination::ProductPager;
pub use retry::RetryPolicy;
