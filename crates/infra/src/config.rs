//! Configuration loading from environment variables.

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use storefront_catalog::{DEFAULT_PAGE_SIZE, SortMode};

pub const PAGE_SIZE_VAR: &str = "STOREFRONT_PAGE_SIZE";
pub const DEFAULT_SORT_VAR: &str = "STOREFRONT_DEFAULT_SORT";
pub const IMAGE_BASE_URL_VAR: &str = "STOREFRONT_IMAGE_BASE_URL";
pub const CATALOG_PATH_VAR: &str = "STOREFRONT_CATALOG_PATH";
pub const IMAGE_DIR_VAR: &str = "STOREFRONT_IMAGE_DIR";

pub const DEFAULT_IMAGE_BASE_URL: &str = "memory://product-images";

/// Configuration error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Configuration that can be loaded from environment variables.
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Value of `key`, or `default` when unset.
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Value of `key`, or an error when unset.
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` with `FromStr`, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Storefront settings shared by the binary and the adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Products per browse page, at least 1.
    pub page_size: usize,
    pub default_sort: SortMode,
    /// Prefix of public image urls handed out by the blob store.
    pub image_base_url: String,
    pub catalog_path: Option<PathBuf>,
    /// Directory holding uploaded image files.
    pub image_dir: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortMode::default(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            catalog_path: None,
            image_dir: None,
        }
    }
}

impl StorefrontConfig {
    /// Image directory: `STOREFRONT_IMAGE_DIR`, else `images/` beside the
    /// catalog file.
    pub fn image_dir_for(&self, catalog: &Path) -> PathBuf {
        match &self.image_dir {
            Some(dir) => dir.clone(),
            None => catalog
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("images"),
        }
    }

    /// Catalog file location; only the binary needs one.
    pub fn require_catalog_path(&self) -> Result<&Path, ConfigError> {
        self.catalog_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(CATALOG_PATH_VAR.to_string()))
    }
}

impl FromEnv for StorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let page_size: usize = env_parse(PAGE_SIZE_VAR, DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::ParseError {
                key: PAGE_SIZE_VAR.to_string(),
                details: "page size must be at least 1".to_string(),
            });
        }

        Ok(Self {
            page_size,
            default_sort: env_parse(DEFAULT_SORT_VAR, SortMode::default())?,
            image_base_url: env_or_default(IMAGE_BASE_URL_VAR, DEFAULT_IMAGE_BASE_URL),
            catalog_path: env_path(CATALOG_PATH_VAR),
            image_dir: env_path(IMAGE_DIR_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 5] = [
        PAGE_SIZE_VAR,
        DEFAULT_SORT_VAR,
        IMAGE_BASE_URL_VAR,
        CATALOG_PATH_VAR,
        IMAGE_DIR_VAR,
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let config = StorefrontConfig::from_env().unwrap();
            assert_eq!(config, StorefrontConfig::default());
            assert_eq!(config.page_size, 6);
            assert_eq!(config.default_sort, SortMode::Recommended);
            assert_eq!(config.image_base_url, "memory://product-images");
        });
    }

    #[test]
    fn test_values_from_env() {
        temp_env::with_vars(
            [
                (PAGE_SIZE_VAR, Some("12")),
                (DEFAULT_SORT_VAR, Some("price-desc")),
                (IMAGE_BASE_URL_VAR, Some("https://cdn.example.com/img")),
                (CATALOG_PATH_VAR, Some("/srv/catalog.json")),
            ],
            || {
                let config = StorefrontConfig::from_env().unwrap();
                assert_eq!(config.page_size, 12);
                assert_eq!(config.default_sort, SortMode::PriceDesc);
                assert_eq!(config.image_base_url, "https://cdn.example.com/img");
                assert_eq!(config.require_catalog_path().unwrap(), Path::new("/srv/catalog.json"));
            },
        );
    }

    #[test]
    fn test_zero_page_size_rejected() {
        temp_env::with_var(PAGE_SIZE_VAR, Some("0"), || {
            let err = StorefrontConfig::from_env().unwrap_err();
            assert!(err.to_string().contains(PAGE_SIZE_VAR));
            assert!(err.to_string().contains("at least 1"));
        });
    }

    #[test]
    fn test_unparseable_values_rejected() {
        temp_env::with_var(PAGE_SIZE_VAR, Some("six"), || {
            assert!(matches!(
                StorefrontConfig::from_env(),
                Err(ConfigError::ParseError { ref key, .. }) if key == PAGE_SIZE_VAR
            ));
        });
        temp_env::with_vars([(PAGE_SIZE_VAR, None), (DEFAULT_SORT_VAR, Some("cheapest"))], || {
            assert!(matches!(
                StorefrontConfig::from_env(),
                Err(ConfigError::ParseError { ref key, .. }) if key == DEFAULT_SORT_VAR
            ));
        });
    }

    #[test]
    fn test_image_dir_defaults_beside_catalog() {
        temp_env::with_var_unset(IMAGE_DIR_VAR, || {
            let config = StorefrontConfig::from_env().unwrap();
            assert_eq!(config.image_dir, None);
            assert_eq!(
                config.image_dir_for(Path::new("/srv/shop/catalog.json")),
                PathBuf::from("/srv/shop/images")
            );
        });
        temp_env::with_var(IMAGE_DIR_VAR, Some("/var/lib/storefront/images"), || {
            let config = StorefrontConfig::from_env().unwrap();
            assert_eq!(
                config.image_dir_for(Path::new("/srv/shop/catalog.json")),
                PathBuf::from("/var/lib/storefront/images")
            );
        });
    }

    #[test]
    fn test_missing_catalog_path() {
        temp_env::with_var_unset(CATALOG_PATH_VAR, || {
            let config = StorefrontConfig::from_env().unwrap();
            let err = config.require_catalog_path().unwrap_err();
            assert_eq!(err, ConfigError::MissingEnvVar(CATALOG_PATH_VAR.to_string()));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var_unset("STOREFRONT_TEST_UNSET", || {
            assert_eq!(env_or_default("STOREFRONT_TEST_UNSET", "fallback"), "fallback");
            assert!(env_required("STOREFRONT_TEST_UNSET").is_err());
        });
    }
}
