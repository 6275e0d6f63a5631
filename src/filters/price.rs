//! Price range filter.

use super::Filter;
use crate::shopify::Product;
use rust_decimal::Decimal;

/// Filters products by first-variant price.
pub struct PriceFilter {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, product: &Product) -> bool {
        // Products without a variant price are kept
        let Some(price) = product.price else {
            return true;
        };

        if self.min.is_some_and(|min| price < min) {
            return false;
        }

        if self.max.is_some_and(|max| price > max) {
            return false;
        }

        true
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Price: ${} - ${}", min, max),
            (Some(min), None) => format!("Price: >= ${}", min),
            (None, Some(max)) => format!("Price: <= ${}", max),
            (None, None) => "Price: any".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_product(price: Option<&str>) -> Product {
        let product = Product::new(1, "Test");
        match price {
            Some(p) => product.with_price(dec(p)),
            None => product,
        }
    }

    #[test]
    fn test_price_range() {
        let filter = PriceFilter::new(Some(dec("10")), Some(dec("50")));

        assert!(filter.matches(&make_product(Some("25.00"))));
        assert!(filter.matches(&make_product(Some("10.00"))));
        assert!(filter.matches(&make_product(Some("50.00"))));
        assert!(!filter.matches(&make_product(Some("9.99"))));
        assert!(!filter.matches(&make_product(Some("50.01"))));
    }

    #[test]
    fn test_no_price_passes() {
        let filter = PriceFilter::new(Some(dec("10")), None);
        assert!(filter.matches(&make_product(None)));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            PriceFilter::new(Some(dec("10")), Some(dec("50.5"))).description(),
            "Price: $10 - $50.5"
        );
        assert_eq!(PriceFilter::new(Some(dec("10")), None).description(), "Price: >= $10");
        assert_eq!(PriceFilter::new(None, Some(dec("5"))).description(), "Price: <= $5");
        assert_eq!(PriceFilter::new(None, None).description(), "Price: any");
    }
}
