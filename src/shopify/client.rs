//! HTTP client for the Shopify Admin REST products endpoint.

use crate::config::{Config, Credentials, StatusFilter};
use crate::error::ShopError;
use crate::shopify::models::{Page, Product, ProductsResponse};
use crate::shopify::pagination::extract_next_cursor;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::header::HeaderValue;
use wreq::Client;

/// Largest `limit` the products endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Trait for single-page catalog retrieval - enables mocking for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches one page of products starting at `cursor` (first page when `None`).
    async fn fetch_page(&self, cursor: Option<&str>, limit: u32) -> Result<Page, ShopError>;
}

/// Shopify Admin API client bound to one store.
pub struct ShopifyClient {
    client: Client,
    credentials: Credentials,
    api_version: String,
    status: StatusFilter,
    base_url: Option<String>,
}

impl ShopifyClient {
    /// Creates a new client for the store named in the configuration.
    pub fn new(config: &Config) -> Result<Self, ShopError> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self, ShopError> {
        Self::with_credentials(config, config.credentials(), base_url)
    }

    /// Creates a client from explicit credentials, ignoring those in `config`.
    pub fn with_credentials(
        config: &Config,
        credentials: Credentials,
        base_url: Option<String>,
    ) -> Result<Self, ShopError> {
        let mut builder = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| ShopError::InvalidInput(format!("proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            credentials,
            api_version: config.api_version.clone(),
            status: config.status,
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the store domain for production).
    fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.credentials.store_domain()))
    }

    /// Builds the products URL for one page request.
    ///
    /// Cursor requests may only carry `limit` and `page_info`.
    fn products_url(&self, cursor: Option<&str>, limit: u32) -> String {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut url = format!(
            "{}/admin/api/{}/products.json?limit={}",
            self.base_url(),
            self.api_version,
            limit
        );

        match cursor {
            Some(cursor) => {
                url.push_str("&page_info=");
                url.push_str(&urlencoding::encode(cursor));
            }
            None => {
                if let Some(status) = self.status.as_query() {
                    url.push_str("&status=");
                    url.push_str(status);
                }
            }
        }

        url
    }
}

#[async_trait]
impl CatalogSource for ShopifyClient {
    async fn fetch_page(&self, cursor: Option<&str>, limit: u32) -> Result<Page, ShopError> {
        if !self.credentials.is_complete() {
            return Err(ShopError::Authentication {
                reason: "shop name and access token are required".to_string(),
            });
        }

        let url = self.products_url(cursor, limit);
        match cursor {
            Some(_) => debug!("GET {} (continuing)", url),
            None => info!("Fetching first page from {}", self.credentials.store_domain()),
        }

        let mut token = HeaderValue::from_str(self.credentials.token()).map_err(|_| {
            ShopError::Authentication {
                reason: "access token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        token.set_sensitive(true);

        let response = self
            .client
            .get(&url)
            .header("X-Shopify-Access-Token", token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        let headers = response.headers();
        let link = header_str(headers, "link");
        let call_limit = header_str(headers, "x-shopify-shop-api-call-limit");
        let retry_after = header_str(headers, "retry-after").as_deref().and_then(parse_retry_after);

        if let Some(limit) = &call_limit {
            debug!("API call limit: {}", limit);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ShopError::from_status(status.as_u16(), retry_after, &body));
        }

        let parsed: ProductsResponse = serde_json::from_str(&body)?;
        let products: Vec<Product> = parsed.products.into_iter().map(Product::from).collect();
        let next_cursor = extract_next_cursor(link.as_deref());

        debug!("Page returned {} products (more: {})", products.len(), next_cursor.is_some());

        Ok(Page { products, next_cursor, call_limit })
    }
}

fn header_str(headers: &wreq::header::HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

/// Parses a `Retry-After` value in (possibly fractional) seconds.
///
/// Shopify sends e.g. `2.0`; HTTP-date values are not used by the API and are ignored.
/// Values too large for a `Duration` saturate; the retry policy caps the wait.
pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRODUCTS_PATH: &str = "/admin/api/2023-10/products.json";

    fn make_test_config() -> Config {
        let mut config = Config::new();
        config.shop = Some("fixture-store".to_string());
        config.access_token = Some("shpat_fixture".to_string());
        config.retry_delay_ms = 0;
        config
    }

    fn product_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "handle": title.to_lowercase().replace(' ', "-"),
            "vendor": "Acme",
            "product_type": "Apparel",
            "status": "active",
            "variants": [{"price": "19.99", "inventory_quantity": 3}]
        })
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("2.0"), Some(Duration::from_secs(2)));
        assert_eq!(parse_retry_after(" 0.5 "), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after("-1"), None);
        assert_eq!(parse_retry_after("NaN"), None);
        assert_eq!(parse_retry_after("99999999999999999999"), Some(Duration::MAX));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_products_url_first_page() {
        let config = make_test_config();
        let client = ShopifyClient::new(&config).unwrap();

        assert_eq!(
            client.products_url(None, 50),
            "https://fixture-store.myshopify.com/admin/api/2023-10/products.json?limit=50&status=active"
        );
    }

    #[test]
    fn test_products_url_cursor_drops_filters() {
        let config = make_test_config();
        let client = ShopifyClient::new(&config).unwrap();

        let url = client.products_url(Some("eyJsYXN0X2lkIjo0fQ=="), 50);
        assert!(url.ends_with("?limit=50&page_info=eyJsYXN0X2lkIjo0fQ%3D%3D"));
        assert!(!url.contains("status="));
    }

    #[test]
    fn test_products_url_clamps_limit() {
        let mut config = make_test_config();
        config.status = StatusFilter::Any;
        let client = ShopifyClient::new(&config).unwrap();

        assert!(client.products_url(None, 1000).ends_with("?limit=250"));
        assert!(client.products_url(None, 0).ends_with("?limit=1"));
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .and(header("X-Shopify-Access-Token", "shpat_fixture"))
            .and(query_param("limit", "2"))
            .and(query_param("status", "active"))
            .and(query_param_is_missing("page_info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Link",
                        "<https://fixture-store.myshopify.com/admin/api/2023-10/products.json?limit=2&page_info=abc123>; rel=\"next\"",
                    )
                    .insert_header("X-Shopify-Shop-Api-Call-Limit", "1/40")
                    .set_body_json(json!({
                        "products": [product_json(1, "Awesome T-Shirt"), product_json(2, "Cool Sneakers")]
                    })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let page = client.fetch_page(None, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.products[0].title, "Awesome T-Shirt");
        assert_eq!(page.products[1].id, 2);
        assert_eq!(page.next_cursor.as_deref(), Some("abc123"));
        assert_eq!(page.call_limit.as_deref(), Some("1/40"));
    }

    #[tokio::test]
    async fn test_fetch_page_with_cursor_is_idempotent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .and(query_param("page_info", "abc123"))
            .and(query_param_is_missing("status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": [product_json(3, "Wool Socks")]})),
            )
            .expect(2)
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let first = client.fetch_page(Some("abc123"), 2).await.unwrap();
        let second = client.fetch_page(Some("abc123"), 2).await.unwrap();
        assert_eq!(first.products, second.products);
        assert!(first.is_last());
    }

    #[tokio::test]
    async fn test_unauthorized_401() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"errors": "[API] Invalid API key or access token"})),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_forbidden_403() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_rate_limited_429() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2.0"))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        match client.fetch_page(None, 50).await {
            Err(ShopError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(2)));
            }
            other => panic!("expected rate limit, got {:?}", other.map(|p| p.len())),
        }
    }

    #[tokio::test]
    async fn test_rate_limited_huge_retry_after() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(
                ResponseTemplate::new(429).insert_header("Retry-After", "99999999999999999999"),
            )
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(err.is_rate_limit());
    }

    #[tokio::test]
    async fn test_http_error_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(matches!(err, ShopError::Service { status: 500, .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PRODUCTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(matches!(err, ShopError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_credentials_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut config = make_test_config();
        config.access_token = None;
        let client = ShopifyClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_token_not_valid_in_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let credentials = Credentials::new("fixture-store", "shpat_abc\ndef");
        let client =
            ShopifyClient::with_credentials(&config, credentials, Some(mock_server.uri())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("not allowed in an HTTP header"));
    }

    #[tokio::test]
    async fn test_network_error() {
        let config = make_test_config();
        // Port 9 (discard) on localhost is closed in test environments
        let client =
            ShopifyClient::with_base_url(&config, Some("http://127.0.0.1:9".to_string())).unwrap();

        let err = client.fetch_page(None, 50).await.unwrap_err();
        assert!(matches!(err, ShopError::Network(_)));
    }

    #[test]
    fn test_base_url_default() {
        let config = make_test_config();
        let client = ShopifyClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://fixture-store.myshopify.com");
    }

    #[test]
    fn test_explicit_credentials_override_config() {
        let config = Config::new();
        let credentials = Credentials::new("other-store.myshopify.com", "shpat_other");
        let client = ShopifyClient::with_credentials(&config, credentials, None).unwrap();
        assert_eq!(client.base_url(), "https://other-store.myshopify.com");
    }
}
