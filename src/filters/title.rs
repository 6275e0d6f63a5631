//! Case-insensitive title matching.

use super::Filter;
use crate::shopify::Product;

/// Filters products by substrings of the title.
pub struct TitleFilter {
    /// Terms that must all appear in the title.
    required: Vec<String>,
    /// Terms that must NOT appear in the title.
    excluded: Vec<String>,
}

impl TitleFilter {
    /// Creates a new title filter.
    pub fn new(required: Vec<String>, excluded: Vec<String>) -> Self {
        Self {
            required: required.into_iter().map(|k| k.to_lowercase()).collect(),
            excluded: excluded.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Matches titles containing `term`.
    pub fn contains(term: impl Into<String>) -> Self {
        Self::new(vec![term.into()], Vec::new())
    }

    /// Rejects titles containing any of `terms`.
    pub fn excluding(terms: Vec<String>) -> Self {
        Self::new(Vec::new(), terms)
    }
}

impl Filter for TitleFilter {
    fn matches(&self, product: &Product) -> bool {
        let title = product.title.to_lowercase();

        self.required.iter().all(|term| title.contains(term))
            && !self.excluded.iter().any(|term| title.contains(term))
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();

        if !self.required.is_empty() {
            parts.push(format!("Title contains: {}", self.required.join(", ")));
        }

        if !self.excluded.is_empty() {
            parts.push(format!("Title excludes: {}", self.excluded.join(", ")));
        }

        if parts.is_empty() {
            "Title: any".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(title: &str) -> Product {
        Product::new(1, title)
    }

    #[test]
    fn test_contains_case_insensitive() {
        let filter = TitleFilter::contains("shirt");

        assert!(filter.matches(&make_product("Awesome T-Shirt")));
        assert!(!filter.matches(&make_product("Cool Sneakers")));
        assert!(filter.matches(&make_product("SHIRTS & TIES")));
    }

    #[test]
    fn test_uppercase_term() {
        let filter = TitleFilter::contains("SNEAK");
        assert!(filter.matches(&make_product("Cool Sneakers")));
    }

    #[test]
    fn test_unicode_title() {
        let filter = TitleFilter::contains("crème");
        assert!(filter.matches(&make_product("CRÈME Brûlée Candle")));
    }

    #[test]
    fn test_excluding() {
        let filter = TitleFilter::excluding(vec!["Sample".to_string(), "gift card".to_string()]);

        assert!(filter.matches(&make_product("Wool Socks")));
        assert!(!filter.matches(&make_product("Sample Pack")));
        assert!(!filter.matches(&make_product("$25 Gift Card")));
    }

    #[test]
    fn test_required_and_excluded() {
        let filter = TitleFilter::new(vec!["shirt".to_string()], vec!["kids".to_string()]);

        assert!(filter.matches(&make_product("Linen Shirt")));
        assert!(!filter.matches(&make_product("Kids Shirt")));
    }

    #[test]
    fn test_description() {
        assert_eq!(TitleFilter::contains("Shirt").description(), "Title contains: shirt");
        assert_eq!(
            TitleFilter::excluding(vec!["sample".to_string()]).description(),
            "Title excludes: sample"
        );
        assert_eq!(TitleFilter::new(Vec::new(), Vec::new()).description(), "Title: any");
    }
}
