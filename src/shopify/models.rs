//! Data models for Shopify products and result pages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog record as displayed and exported.
///
/// Price and inventory come from the first variant, when the product has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Shopify product ID
    pub id: u64,
    /// Product title
    pub title: String,
    /// URL handle
    pub handle: String,
    /// Vendor name (empty when unset)
    pub vendor: String,
    /// Product type (empty when unset)
    pub product_type: String,
    /// Publication status
    pub status: ProductStatus,
    /// Price of the first variant
    pub price: Option<Decimal>,
    /// Inventory of the first variant
    pub inventory_quantity: Option<i64>,
}

impl Product {
    /// Creates an active product with only an ID and a title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            handle: String::new(),
            vendor: String::new(),
            product_type: String::new(),
            status: ProductStatus::Active,
            price: None,
            inventory_quantity: None,
        }
    }

    /// Sets the first-variant price.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Returns the price as `$12.34`, or `N/A` when absent.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("${}", price),
            None => "N/A".to_string(),
        }
    }
}

/// Product publication status.
///
/// Values this client does not know about are kept verbatim so exports
/// reproduce what the server sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
    Unknown(String),
}

impl ProductStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
            ProductStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ProductStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => ProductStatus::Active,
            "draft" => ProductStatus::Draft,
            "archived" => ProductStatus::Archived,
            _ => ProductStatus::Unknown(raw),
        }
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Records in server order
    pub products: Vec<Product>,
    /// Cursor for the following page; `None` on the last page
    pub next_cursor: Option<String>,
    /// Raw `X-Shopify-Shop-Api-Call-Limit` value, e.g. `"32/40"`
    pub call_limit: Option<String>,
}

impl Page {
    /// Creates a page from records and an optional next cursor.
    pub fn new(products: Vec<Product>, next_cursor: Option<String>) -> Self {
        Self { products, next_cursor, call_limit: None }
    }

    /// Returns true if this is the final page.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Body of `GET /admin/api/{version}/products.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<ApiProduct>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub variants: Vec<ApiVariant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiVariant {
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

impl From<ApiProduct> for Product {
    fn from(api: ApiProduct) -> Self {
        let first_variant = api.variants.into_iter().next();

        Self {
            id: api.id,
            title: api.title,
            handle: api.handle.unwrap_or_default(),
            vendor: api.vendor.unwrap_or_default(),
            product_type: api.product_type.unwrap_or_default(),
            status: api.status,
            price: first_variant.as_ref().and_then(|v| v.price),
            inventory_quantity: first_variant.and_then(|v| v.inventory_quantity),
        }
    }
}
