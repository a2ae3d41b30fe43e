//! Remote store configuration, read from the environment.
//!
//! Missing credentials are a normal state: [`StoreConfig::from_env`] returns
//! `Ok(None)` and the repository serves generated stations instead.

use bon::Builder;
use thiserror::Error;

pub const ENV_API_KEY: &str = "AIRTABLE_API_KEY";
pub const ENV_BASE_ID: &str = "AIRTABLE_BASE_ID";
pub const ENV_TABLE: &str = "AIRTABLE_TABLE";
pub const ENV_VIEW: &str = "AIRTABLE_VIEW";
pub const ENV_BASE_URL: &str = "AIRTABLE_BASE_URL";
pub const ENV_PAGE_SIZE: &str = "AIRTABLE_PAGE_SIZE";

pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TABLE: &str = "tblXpiLDcSOKE5o8e";
pub const DEFAULT_VIEW: &str = "viwZbnqGr4ujOyjDd";
/// Largest page the list endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Connection settings for the hosted station table.
///
/// ```
/// use fuelmap::StoreConfig;
///
/// let config = StoreConfig::builder()
///     .api_key("key")
///     .base_id("appBase")
///     .build();
/// assert_eq!(config.page_size, 100);
/// assert!(config.list_url().ends_with("/appBase/tblXpiLDcSOKE5o8e"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct StoreConfig {
    #[builder(into)]
    pub api_key: String,
    #[builder(into)]
    pub base_id: String,
    #[builder(into, default = DEFAULT_TABLE.to_string())]
    pub table: String,
    #[builder(into, default = DEFAULT_VIEW.to_string())]
    pub view: String,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = MAX_PAGE_SIZE)]
    pub page_size: u32,
    #[builder(default = 30)]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Loads a `.env` file if there is one, then reads the process environment.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Reads the process environment without touching `.env` files.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Returns `Ok(None)` when the API key or base id is absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let (Some(api_key), Some(base_id)) = (non_blank(ENV_API_KEY), non_blank(ENV_BASE_ID))
        else {
            return Ok(None);
        };

        let page_size = match non_blank(ENV_PAGE_SIZE) {
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| ConfigError::InvalidEnvVar {
                        var: ENV_PAGE_SIZE.to_string(),
                        reason: e.to_string(),
                    })?;
                if parsed == 0 {
                    return Err(ConfigError::InvalidEnvVar {
                        var: ENV_PAGE_SIZE.to_string(),
                        reason: "page size must be at least 1".to_string(),
                    });
                }
                parsed.min(MAX_PAGE_SIZE)
            }
            None => MAX_PAGE_SIZE,
        };

        Ok(Some(
            StoreConfig::builder()
                .api_key(api_key.trim())
                .base_id(base_id.trim())
                .maybe_table(non_blank(ENV_TABLE))
                .maybe_view(non_blank(ENV_VIEW))
                .maybe_base_url(non_blank(ENV_BASE_URL))
                .page_size(page_size)
                .build(),
        ))
    }

    /// The list endpoint for the configured table.
    pub fn list_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.base_id,
            self.table
        )
    }
}
