//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application configuration with layered loading.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store name (`my-store`) or full domain (`my-store.myshopify.com`)
    #[serde(default)]
    pub shop: Option<String>,

    /// Admin API access token. Never written back out.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    /// Admin REST API version segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Records requested per page (clamped to 1..=250)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Status filter sent with the first page request
    #[serde(default)]
    pub status: StatusFilter,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries of a single page after HTTP 429
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff used when the server sends no Retry-After header
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Default file for JSON exports
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
}

fn default_api_version() -> String {
    "2023-10".to_string()
}

fn default_page_size() -> u32 {
    250
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_export_path() -> PathBuf {
    PathBuf::from("shopify_products.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shop: None,
            access_token: None,
            api_version: default_api_version(),
            page_size: default_page_size(),
            status: StatusFilter::Active,
            format: OutputFormat::Table,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            proxy: None,
            export_path: default_export_path(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("shop", &self.shop)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("page_size", &self.page_size)
            .field("status", &self.status)
            .field("format", &self.format)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("proxy", &self.proxy)
            .field("export_path", &self.export_path)
            .finish()
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("shopify-fetch").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are skipped with a warning so the previous layer wins.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(shop) = lookup("SHOPIFY_SHOP_NAME").filter(|s| !s.trim().is_empty()) {
            self.shop = Some(shop.trim().to_string());
        }

        if let Some(token) = lookup("SHOPIFY_ACCESS_TOKEN").filter(|s| !s.trim().is_empty()) {
            self.access_token = Some(token.trim().to_string());
        }

        if let Some(version) = lookup("SHOPIFY_API_VERSION").filter(|s| !s.trim().is_empty()) {
            self.api_version = version.trim().to_string();
        }

        if let Some(size) = lookup("SHOPIFY_PAGE_SIZE") {
            match size.trim().parse() {
                Ok(n) => self.page_size = n,
                Err(_) => warn!("Ignoring invalid SHOPIFY_PAGE_SIZE: {}", size),
            }
        }

        if let Some(proxy) = lookup("SHOPIFY_PROXY").filter(|s| !s.trim().is_empty()) {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Returns the credentials carried by this configuration.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.shop.clone().unwrap_or_default(),
            self.access_token.clone().unwrap_or_default(),
        )
    }
}

/// Store identifier plus Admin API token.
///
/// Built once at startup and passed explicitly into the client.
#[derive(Debug, Clone)]
pub struct Credentials {
    shop: String,
    access_token: SecretString,
}

impl Credentials {
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into().trim().to_string(),
            access_token: SecretString::from(access_token.into().trim().to_string()),
        }
    }

    /// Returns the store identifier as configured.
    pub fn shop(&self) -> &str {
        &self.shop
    }

    /// Returns true when both the shop and the token are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.shop.is_empty() && !self.access_token.expose_secret().is_empty()
    }

    /// Returns the `*.myshopify.com` domain for the store.
    pub fn store_domain(&self) -> String {
        let shop = self
            .shop
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        if shop.ends_with(".myshopify.com") {
            shop.to_string()
        } else {
            format!("{}.myshopify.com", shop)
        }
    }

    pub(crate) fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Product status filter for the listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Active,
    Draft,
    Archived,
    /// No status parameter; the API returns every status.
    Any,
}

impl StatusFilter {
    /// Returns the `status` query value, or `None` for [`StatusFilter::Any`].
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            StatusFilter::Active => Some("active"),
            StatusFilter::Draft => Some("draft"),
            StatusFilter::Archived => Some("archived"),
            StatusFilter::Any => None,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "draft" => Ok(StatusFilter::Draft),
            "archived" => Ok(StatusFilter::Archived),
            "any" | "all" => Ok(StatusFilter::Any),
            _ => Err(format!("Unknown status: {}. Use: active, draft, archived, any", s)),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query().unwrap_or("any"))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
