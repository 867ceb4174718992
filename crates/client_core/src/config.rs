use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::protocol::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "ereport.toml";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API base URL is not configured (set api_base_url in ereport.toml or EREPORT_API_BASE_URL)")]
    MissingBaseUrl,
    #[error("API base URL '{value}' is invalid: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to read settings file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("environment variable {name}='{value}' is not a whole number")]
    InvalidNumber { name: &'static str, value: String },
}

/// Settings as found in the file and environment, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
    pub notification_ttl_secs: Option<u64>,
}

/// Validated configuration injected into the gateway and page controllers.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub notification_ttl: Duration,
}

impl ClientSettings {
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        RawSettings {
            api_base_url: Some(base_url.to_string()),
            ..RawSettings::default()
        }
        .validate()
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<RawSettings, ConfigError> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Layers defaults, the TOML file, then environment overrides.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<RawSettings, ConfigError> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                RawSettings::default()
            }
        }
    };

    let env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = env("EREPORT_API_BASE_URL") {
        settings.api_base_url = Some(v);
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = Some(v);
    }
    if let Some(v) = number(&env, "APP__REQUEST_TIMEOUT_SECS")? {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = number(&env, "APP__PAGE_SIZE")? {
        settings.page_size = Some(v);
    }
    if let Some(v) = number(&env, "APP__NOTIFICATION_TTL_SECS")? {
        settings.notification_ttl_secs = Some(v);
    }

    Ok(settings)
}

fn number<T: std::str::FromStr>(
    env: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    env(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}

fn read_settings_file(path: &Path) -> Result<RawSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl RawSettings {
    pub fn validate(self) -> Result<ClientSettings, ConfigError> {
        let raw_url = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let api_base_url = normalize_base_url(raw_url)?;

        let request_timeout_secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request_timeout_secs"));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::Zero("page_size"));
        }

        Ok(ClientSettings {
            api_base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            page_size: page_size.min(MAX_PAGE_SIZE),
            notification_ttl: Duration::from_secs(
                self.notification_ttl_secs
                    .unwrap_or(DEFAULT_NOTIFICATION_TTL_SECS),
            ),
        })
    }
}

/// Parses the base URL and gives it a trailing slash so resource paths join
/// beneath it instead of replacing its last segment.
fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
