//! Client configuration parsed from environment variables.

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_ASSET_BASE_URL: &str = "https://www.farforrent.com.ua/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable that needs a value was set to an empty string.
    #[error("{var} is set but empty")]
    Missing { var: String },

    /// A variable holds a value that cannot be used.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Board storage API root, without a trailing slash.
    pub api_base_url: String,
    /// Bearer token sent with storage requests.
    pub api_token: Option<String>,
    /// Host that relative product image paths resolve against.
    pub asset_base_url: String,
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_token: None,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `MOODBOARD_API_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `MOODBOARD_API_TOKEN`: no auth header when absent or empty
    /// - `MOODBOARD_ASSET_BASE_URL`: default `https://www.farforrent.com.ua/`
    /// - `MOODBOARD_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MOODBOARD_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for empty URLs, URLs without an http(s)
    /// scheme, and timeouts that are not positive integers.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = parse_url(&lookup, "MOODBOARD_API_BASE_URL", DEFAULT_API_BASE_URL)?
            .trim_end_matches('/')
            .to_owned();
        let api_token = normalize_token(lookup("MOODBOARD_API_TOKEN"));
        let asset_base_url = parse_url(&lookup, "MOODBOARD_ASSET_BASE_URL", DEFAULT_ASSET_BASE_URL)?;
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, "MOODBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "MOODBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_base_url, api_token, asset_base_url, timeouts })
    }

    /// Apply command-line overrides with the same rules as the environment.
    /// A blank token clears the configured one.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty base URL or one without an
    /// http(s) scheme.
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = base_url {
            let lookup = |_: &str| Some(raw.clone());
            self.api_base_url = parse_url(&lookup, "--base-url", DEFAULT_API_BASE_URL)?.trim_end_matches('/').to_owned();
        }
        if token.is_some() {
            self.api_token = normalize_token(token);
        }
        Ok(self)
    }
}

fn normalize_token(raw: Option<String>) -> Option<String> {
    raw.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

fn parse_url(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: &str) -> Result<String, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default.to_owned());
    };
    let value = raw.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing { var: var.to_owned() });
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Invalid { var: var.to_owned(), value: raw });
    }
    Ok(value.to_owned())
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid { var: var.to_owned(), value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
