//! Catalog backend configuration.
//!
//! # Responsibility
//! - Hold the REST endpoint coordinates used by the category fetch.
//! - Apply defaults and environment overrides, then validate once.
//!
//! # Invariants
//! - `base_url` is an absolute `http`/`https` URL without a trailing slash.
//! - `categories_path` is non-empty and has no leading slash.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend used by the storefront in local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Flat category listing endpoint, relative to the base URL.
pub const DEFAULT_CATEGORIES_PATH: &str = "categories/flat";
/// Environment variable overriding `base_url`.
pub const ENV_API_BASE_URL: &str = "STOREFRONT_API_BASE_URL";
/// Environment variable overriding `categories_path`.
pub const ENV_CATEGORIES_PATH: &str = "STOREFRONT_CATEGORIES_PATH";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBaseUrl,
    InvalidBaseUrl(String),
    EmptyCategoriesPath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBaseUrl => write!(f, "api base url cannot be empty"),
            Self::InvalidBaseUrl(value) => {
                write!(f, "api base url must be an absolute http(s) url, got `{value}`")
            }
            Self::EmptyCategoriesPath => write!(f, "categories path cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// REST coordinates of the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub categories_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            categories_path: DEFAULT_CATEGORIES_PATH.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Builds a validated configuration.
    pub fn new(
        base_url: impl Into<String>,
        categories_path: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            categories_path: normalize_path(&categories_path.into())?,
        })
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, falling back to defaults for unset
    /// or blank values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self::new(
            read(ENV_API_BASE_URL, DEFAULT_API_BASE_URL),
            read(ENV_CATEGORIES_PATH, DEFAULT_CATEGORIES_PATH),
        )
    }

    /// Full URL of the flat category listing.
    pub fn categories_url(&self) -> String {
        format!("{}/{}", self.base_url, self.categories_path)
    }
}

fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ConfigError::InvalidBaseUrl(trimmed.to_string())),
    }
}

fn normalize_path(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyCategoriesPath);
    }
    Ok(trimmed.to_string())
}
