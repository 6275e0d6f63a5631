//! Product filtering system with composable filters.

pub mod price;
pub mod title;

use crate::shopify::Product;
use rust_decimal::Decimal;

pub use price::PriceFilter;
pub use title::TitleFilter;

/// Trait for filtering products.
pub trait Filter: Send + Sync {
    /// Returns true if the product passes the filter.
    fn matches(&self, product: &Product) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a product passes all filters.
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filters a collection of products, keeping order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        if self.filters.is_empty() {
            return products;
        }
        products.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from command options.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Adds a title substring filter. The term is matched as given; blank terms are skipped.
    pub fn title(mut self, term: Option<&str>) -> Self {
        if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
            self.chain.add(TitleFilter::contains(term));
        }
        self
    }

    /// Adds excluded title terms.
    pub fn exclude_terms(mut self, terms: Vec<String>) -> Self {
        if !terms.is_empty() {
            self.chain.add(TitleFilter::excluding(terms));
        }
        self
    }

    /// Adds a price range filter.
    pub fn price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        if min.is_some() || max.is_some() {
            self.chain.add(PriceFilter::new(min, max));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
