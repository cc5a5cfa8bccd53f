//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const PRODUCTION_IDENTITY_API_URL: &str = "https://bloggy.hadisamadzad.com/api/identity";
pub const PRODUCTION_BLOG_API_URL: &str = "https://bloggy.hadisamadzad.com/api/blog";
pub const DEVELOPMENT_IDENTITY_API_URL: &str = "http://localhost:6001/api/identity";
pub const DEVELOPMENT_BLOG_API_URL: &str = "http://localhost:6001/api/blog";

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SESSION_FILE: &str = ".bloggy-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown BLOGGY_ENV: {0}")]
    UnknownEnvironment(String),

    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
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
pub struct ClientConfig {
    pub environment: Environment,
    pub identity_api_url: String,
    pub blog_api_url: String,
    pub login_path: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BLOGGY_ENV`: `production` (default) or `development`
    /// - `BLOGGY_IDENTITY_API_URL`: environment default when absent
    /// - `BLOGGY_BLOG_API_URL`: environment default when absent
    /// - `BLOGGY_LOGIN_PATH`: default `/login`
    /// - `BLOGGY_SESSION_FILE`: default `.bloggy-session.json`
    /// - `BLOGGY_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BLOGGY_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `BLOGGY_ENV` is unknown or a timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = parse_environment(lookup("BLOGGY_ENV").as_deref())?;
        let (identity_default, blog_default) = default_urls(environment);

        let identity_api_url = trim_url(lookup("BLOGGY_IDENTITY_API_URL").unwrap_or_else(|| identity_default.to_owned()));
        let blog_api_url = trim_url(lookup("BLOGGY_BLOG_API_URL").unwrap_or_else(|| blog_default.to_owned()));
        let login_path = lookup("BLOGGY_LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_owned());
        let session_file = PathBuf::from(lookup("BLOGGY_SESSION_FILE").unwrap_or_else(|| DEFAULT_SESSION_FILE.to_owned()));
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, "BLOGGY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "BLOGGY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { environment, identity_api_url, blog_api_url, login_path, session_file, timeouts })
    }
}

fn parse_environment(raw: Option<&str>) -> Result<Environment, ConfigError> {
    match raw.map(str::trim).unwrap_or("production") {
        "production" | "" => Ok(Environment::Production),
        "development" => Ok(Environment::Development),
        other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
    }
}

fn default_urls(environment: Environment) -> (&'static str, &'static str) {
    match environment {
        Environment::Production => (PRODUCTION_IDENTITY_API_URL, PRODUCTION_BLOG_API_URL),
        Environment::Development => (DEVELOPMENT_IDENTITY_API_URL, DEVELOPMENT_BLOG_API_URL),
    }
}

fn parse_secs<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
