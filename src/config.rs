use reqwest::Url;
use std::env;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8010";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOCALE: &str = "es-ES";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_SERIES_DAYS: u32 = 30;
pub const DEFAULT_REORDER_HORIZON_DAYS: u32 = 14;

const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must use http or https, got {scheme}")]
    UnsupportedScheme { var: &'static str, scheme: String },
    #[error("{var} must be an integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("{var} must be between {min} and {max}, got {value}")]
    OutOfRange {
        var: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Values that shape what a dashboard render asks the backend for and how it
/// formats the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSettings {
    pub locale: String,
    pub currency: String,
    pub series_days: u32,
    pub reorder_horizon_days: u32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            series_days: DEFAULT_SERIES_DAYS,
            reorder_horizon_days: DEFAULT_REORDER_HORIZON_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Backend base URL without trailing slashes.
    pub api_url: String,
    pub port: u16,
    pub panel: PanelSettings,
}

impl DashboardConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = validate_api_url(&raw_url)?;

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::NotANumber {
                    var: "PORT",
                    value: raw.clone(),
                })?,
        };

        let locale = non_empty(&lookup, "DASHBOARD_LOCALE", DEFAULT_LOCALE)?;
        let currency = non_empty(&lookup, "DASHBOARD_CURRENCY", DEFAULT_CURRENCY)?.to_uppercase();
        let series_days = window_days(&lookup, "SERIES_DAYS", DEFAULT_SERIES_DAYS)?;
        let reorder_horizon_days =
            window_days(&lookup, "REORDER_HORIZON_DAYS", DEFAULT_REORDER_HORIZON_DAYS)?;

        Ok(Self {
            api_url,
            port,
            panel: PanelSettings {
                locale,
                currency,
                series_days,
                reorder_horizon_days,
            },
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            port: DEFAULT_PORT,
            panel: PanelSettings::default(),
        }
    }
}

/// Strips every trailing slash so joining with a path yields exactly one.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn validate_api_url(raw: &str) -> Result<String, ConfigError> {
    let normalized = normalize_base_url(raw);
    let parsed = Url::parse(&normalized).map_err(|_| ConfigError::InvalidUrl {
        var: "API_URL",
        value: raw.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(normalized),
        other => Err(ConfigError::UnsupportedScheme {
            var: "API_URL",
            scheme: other.to_string(),
        }),
    }
}

fn non_empty<F>(lookup: &F, var: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(value) => Ok(value.trim().to_string()),
    }
}

fn window_days<F>(lookup: &F, var: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::NotANumber {
            var,
            value: raw.clone(),
        })?;
    if !(1..=MAX_WINDOW_DAYS).contains(&value) {
        return Err(ConfigError::OutOfRange {
            var,
            value,
            min: 1,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(value)
}
