//! Catalog-level operations built on the pager.

use crate::error::ShopError;
use crate::filters::FilterChainBuilder;
use crate::shopify::client::CatalogSource;
use crate::shopify::pagination::ProductPager;
use tracing::info;

/// Returns a lazy sequence over the whole catalog.
pub fn fetch_all<S>(source: &S, page_size: u32) -> ProductPager<'_, S>
where
    S: CatalogSource + ?Sized,
{
    ProductPager::new(source, page_size)
}

/// Returns a lazy sequence of products whose title contains `term`, ignoring case.
///
/// The whole catalog is paged through and filtered client side.
pub fn search_by_title<'a, S>(
    source: &'a S,
    term: &str,
    page_size: u32,
) -> Result<ProductPager<'a, S>, ShopError>
where
    S: CatalogSource + ?Sized,
{
    if term.trim().is_empty() {
        return Err(ShopError::InvalidInput("search term must not be empty".to_string()));
    }

    info!("Searching titles for: {:?}", term);

    let filters = FilterChainBuilder::new().title(Some(term)).build();

    Ok(fetch_all(source, page_size).with_filters(filters))
}
