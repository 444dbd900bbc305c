//! Runtime configuration: built-in defaults, then `config.toml` in the
//! platform config directory, then `COURIER_*` environment variables.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::util::project_dirs;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/thisaiapi/";
pub const DEFAULT_CUSTOMER_ID: i64 = 138;
pub const DEFAULT_BOOKED_BY: &str = "user";
pub const DEFAULT_CARRIER_BRAND: &str = "UPS";

const ENV_API_URL: &str = "COURIER_API_URL";
const ENV_CUSTOMER_ID: &str = "COURIER_CUSTOMER_ID";
const ENV_BOOKED_BY: &str = "COURIER_BOOKED_BY";
const ENV_CARRIER_BRAND: &str = "COURIER_CARRIER_BRAND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub customer_id: i64,
    pub booked_by: String,
    pub carrier_brand: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            customer_id: DEFAULT_CUSTOMER_ID,
            booked_by: DEFAULT_BOOKED_BY.to_string(),
            carrier_brand: DEFAULT_CARRIER_BRAND.to_string(),
        }
    }
}

pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl AppConfig {
    /// Never fails: problems are logged and the defaults are used instead.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => {
                tracing::info!(api = %config.api_base_url, customer_id = config.customer_id, "configuration loaded");
                config
            }
            Err(err) => {
                tracing::warn!("falling back to default configuration: {err}");
                Self::default()
            }
        }
    }

    pub fn try_load() -> Result<Self, ConfigError> {
        let mut config = match config_file() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "reading config file");
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Overrides fields from `lookup`; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(ENV_API_URL) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = read(ENV_CUSTOMER_ID) {
            self.customer_id = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_CUSTOMER_ID,
                    value: raw.clone(),
                })?;
        }
        if let Some(name) = read(ENV_BOOKED_BY) {
            self.booked_by = name.trim().to_string();
        }
        if let Some(brand) = read(ENV_CARRIER_BRAND) {
            self.carrier_brand = brand.trim().to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.carrier_brand.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "carrier_brand",
                value: self.carrier_brand.clone(),
            });
        }
        Ok(())
    }

    /// Base URL with a trailing slash so relative joins keep the path prefix.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let trimmed = self.api_base_url.trim();
        if trimmed.ends_with('/') {
            Url::parse(trimmed)
        } else {
            Url::parse(&format!("{trimmed}/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn toml_overrides_defaults_partially() {
        let config = AppConfig::from_toml(
            r#"
            api_base_url = "https://courier.example.com/api"
            customer_id = 501
            "#,
        )
        .unwrap();
        assert_eq!(config.customer_id, 501);
        assert_eq!(config.booked_by, DEFAULT_BOOKED_BY);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://courier.example.com/api/"
        );
    }

    #[test]
    fn env_overrides_and_rejects_bad_numbers() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://10.0.0.5:9000/thisaiapi"),
            (ENV_BOOKED_BY, "ops-desk"),
            (ENV_CARRIER_BRAND, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|key| vars.get(key).map(|value| value.to_string()))
            .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000/thisaiapi");
        assert_eq!(config.booked_by, "ops-desk");
        assert_eq!(config.carrier_brand, DEFAULT_CARRIER_BRAND);

        let err = config
            .apply_env(|key| (key == ENV_CUSTOMER_ID).then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_CUSTOMER_ID, .. }));
    }

    #[test]
    fn invalid_url_fails_validation() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
        assert!(AppConfig::default().validate().is_ok());
    }
}
