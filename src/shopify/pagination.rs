//! Cursor pagination: `Link` header parsing and the lazy product pager.

use crate::error::ShopError;
use crate::filters::FilterChain;
use crate::shopify::client::CatalogSource;
use crate::shopify::models::Product;
use crate::shopify::retry::{fetch_page_with_retry, RetryPolicy};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Extracts the `page_info` cursor from the `rel="next"` entry of a `Link` header.
///
/// Returns `None` when there is no next link, which marks the final page.
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    header
        .split(',')
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part[start..].find('>')? + start;
            let url = &part[start..end];
            let query = url.split_once('?')?.1;

            query.split('&').find_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                if key != "page_info" || value.is_empty() {
                    return None;
                }
                urlencoding::decode(value).ok().map(|v| v.into_owned())
            })
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PagerState {
    /// Nothing requested yet.
    Start,
    /// The previous page returned this cursor.
    Pending(String),
    /// Last page seen or a terminal error was returned.
    Done,
}

/// Lazy, finite, non-restartable sequence of products across pages.
///
/// Pages are requested one at a time, in order, and only when the caller asks
/// for more. A page is requested at most once. Rate-limited requests are retried
/// per the [`RetryPolicy`]; any other error ends the sequence.
pub struct ProductPager<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
    page_size: u32,
    retry: RetryPolicy,
    filters: FilterChain,
    state: PagerState,
    buffer: VecDeque<Product>,
    requested: HashSet<String>,
    pages_fetched: usize,
    records_fetched: usize,
}

impl<'a, S: CatalogSource + ?Sized> ProductPager<'a, S> {
    /// Creates a pager that starts at the first page.
    pub fn new(source: &'a S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            retry: RetryPolicy::default(),
            filters: FilterChain::new(),
            state: PagerState::Start,
            buffer: VecDeque::new(),
            requested: HashSet::new(),
            pages_fetched: 0,
            records_fetched: 0,
        }
    }

    /// Sets the rate-limit retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Applies a filter chain to records as they are fetched.
    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Number of records received from the server so far, before filtering.
    pub fn records_fetched(&self) -> usize {
        self.records_fetched
    }

    /// Returns true once nothing more will be yielded.
    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done && self.buffer.is_empty()
    }

    /// Returns the next product, fetching another page when the buffer runs dry.
    pub async fn next(&mut self) -> Option<Result<Product, ShopError>> {
        loop {
            if let Some(product) = self.buffer.pop_front() {
                return Some(Ok(product));
            }

            match self.fetch_next().await? {
                Ok(products) => self.buffer.extend(products),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Returns the next page worth of products.
    ///
    /// Records buffered by [`Self::next`] are returned first. A page may be empty
    /// after filtering; `None` means the sequence is over.
    pub async fn next_page(&mut self) -> Option<Result<Vec<Product>, ShopError>> {
        if !self.buffer.is_empty() {
            return Some(Ok(self.buffer.drain(..).collect()));
        }
        self.fetch_next().await
    }

    /// Drains every remaining page, preserving server order.
    pub async fn collect_all(mut self) -> Result<Vec<Product>, ShopError> {
        let mut all_products = Vec::new();

        while let Some(page) = self.next_page().await {
            all_products.extend(page?);
        }

        debug!(
            "Fetched {} products across {} pages ({} kept)",
            self.records_fetched,
            self.pages_fetched,
            all_products.len()
        );
        Ok(all_products)
    }

    async fn fetch_next(&mut self) -> Option<Result<Vec<Product>, ShopError>> {
        let cursor = match &self.state {
            PagerState::Done => return None,
            PagerState::Start => None,
            PagerState::Pending(cursor) => {
                let cursor = cursor.clone();
                if !self.requested.insert(cursor.clone()) {
                    self.state = PagerState::Done;
                    return Some(Err(ShopError::Pagination(format!(
                        "server repeated cursor {} after {} pages",
                        cursor, self.pages_fetched
                    ))));
                }
                Some(cursor)
            }
        };

        debug!("Fetching page {}", self.pages_fetched + 1);

        let result =
            fetch_page_with_retry(self.source, cursor.as_deref(), self.page_size, &self.retry).await;

        match result {
            Ok(page) => {
                self.pages_fetched += 1;
                self.records_fetched += page.products.len();
                self.state = match page.next_cursor {
                    Some(next) => PagerState::Pending(next),
                    None => PagerState::Done,
                };

                Some(Ok(self.filters.apply(page.products)))
            }
            Err(e) => {
                self.state = PagerState::Done;
                Some(Err(e))
            }
        }
    }
}
