//! Output formatting for products (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::shopify::Product;

const ID_WIDTH: usize = 14;
const TITLE_WIDTH: usize = 30;
const VENDOR_WIDTH: usize = 15;
const TYPE_WIDTH: usize = 15;
const PRICE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 10;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    // JSON formatting

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{:<ID_WIDTH$}  {:<TITLE_WIDTH$}  {:<VENDOR_WIDTH$}  {:<TYPE_WIDTH$}  {:<PRICE_WIDTH$}  {:<STATUS_WIDTH$}",
            "ID", "Title", "Vendor", "Type", "Price", "Status"
        ));
        lines.push(format!(
            "{:-<ID_WIDTH$}  {:-<TITLE_WIDTH$}  {:-<VENDOR_WIDTH$}  {:-<TYPE_WIDTH$}  {:-<PRICE_WIDTH$}  {:-<STATUS_WIDTH$}",
            "", "", "", "", "", ""
        ));

        for product in products {
            lines.push(format!(
                "{:<ID_WIDTH$}  {:<TITLE_WIDTH$}  {:<VENDOR_WIDTH$}  {:<TYPE_WIDTH$}  {:>PRICE_WIDTH$}  {:<STATUS_WIDTH$}",
                product.id,
                truncate(&product.title, TITLE_WIDTH),
                truncate(&product.vendor, VENDOR_WIDTH),
                truncate(&product.product_type, TYPE_WIDTH),
                product.price_label(),
                truncate(product.status.as_str(), STATUS_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| ID | Title | Vendor | Type | Price | Status |".to_string());
        lines.push("|----|-------|--------|------|-------|--------|".to_string());

        for product in products {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} |",
                product.id,
                markdown_escape(&product.title),
                markdown_escape(&product.vendor),
                markdown_escape(&product.product_type),
                product.price_label(),
                markdown_escape(product.status.as_str())
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,title,handle,vendor,product_type,status,price,inventory_quantity".to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            let price = product.price.map(|p| p.to_string()).unwrap_or_default();
            let inventory =
                product.inventory_quantity.map(|q| q.to_string()).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                product.id,
                Self::csv_escape(&product.title),
                Self::csv_escape(&product.handle),
                Self::csv_escape(&product.vendor),
                Self::csv_escape(&product.product_type),
                Self::csv_escape(product.status.as_str()),
                price,
                inventory
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens `s` to at most `width` chars, ending in `...` when cut.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn markdown_escape(s: &str) -> String {
    s.replace('|', "\\|")
}
