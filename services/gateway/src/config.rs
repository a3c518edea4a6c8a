//! Runtime configuration
//!
//! Read once at start-up from environment variables. Every variable is
//! optional; malformed values abort start-up with the offending variable named.

use reqwest::Url;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use types::vendor::Vendor;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://20.244.56.144/test/companies";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which implementation serves `GET /categories/{category}/products/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Fixed in-memory sample catalog with simulated latency
    #[default]
    Mock,
    /// Relay the upstream product detail endpoint
    Upstream,
}

impl FromStr for LookupMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(LookupMode::Mock),
            "upstream" => Ok(LookupMode::Upstream),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    /// Validated as an absolute URL by [`GatewayConfig::from_lookup`]
    pub upstream_base_url: String,
    pub vendors: Vec<Vendor>,
    pub lookup_mode: LookupMode,
    pub lookup_delay: Duration,
    /// `top` sent to each vendor
    pub vendor_fetch_limit: u32,
    pub max_page_size: usize,
    pub vendor_concurrency: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            vendors: Vendor::ALL.to_vec(),
            lookup_mode: LookupMode::Mock,
            lookup_delay: Duration::from_millis(1000),
            vendor_fetch_limit: 50,
            max_page_size: 10,
            vendor_concurrency: Vendor::ALL.len(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source, falling back to defaults
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = get("GATEWAY_ADDR") {
            config.listen_addr = parse("GATEWAY_ADDR", &addr)?;
        }
        if let Some(url) = get("UPSTREAM_BASE_URL") {
            Url::parse(&url).map_err(|_| invalid("UPSTREAM_BASE_URL", &url))?;
            config.upstream_base_url = url;
        }
        if let Some(list) = get("VENDORS") {
            let vendors = list
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(Vendor::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid("VENDORS", &list))?;
            if vendors.is_empty() {
                return Err(invalid("VENDORS", &list));
            }
            config.vendors = vendors;
        }
        if let Some(mode) = get("PRODUCT_LOOKUP") {
            config.lookup_mode = mode.parse().map_err(|_| invalid("PRODUCT_LOOKUP", &mode))?;
        }
        if let Some(ms) = get("LOOKUP_DELAY_MS") {
            config.lookup_delay = Duration::from_millis(parse("LOOKUP_DELAY_MS", &ms)?);
        }
        if let Some(top) = get("VENDOR_FETCH_LIMIT") {
            config.vendor_fetch_limit = parse_positive("VENDOR_FETCH_LIMIT", &top)?;
        }
        if let Some(size) = get("MAX_PAGE_SIZE") {
            config.max_page_size = parse_positive("MAX_PAGE_SIZE", &size)?;
        }
        if let Some(n) = get("VENDOR_CONCURRENCY") {
            config.vendor_concurrency = parse_positive("VENDOR_CONCURRENCY", &n)?;
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(var, value))
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let parsed: T = parse(var, value)?;
    if parsed <= T::default() {
        return Err(invalid(var, value));
    }
    Ok(parsed)
}
