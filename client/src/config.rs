//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Directory under the user config dir holding the stored credential.
const CONFIG_DIR_NAME: &str = "dooh-admin";
const TOKEN_FILE_NAME: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("no config directory available; set DOOH_TOKEN_FILE")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    /// Where the bearer credential is persisted between runs.
    pub token_file: PathBuf,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `DOOH_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `DOOH_TOKEN_FILE`: default `<config dir>/dooh-admin/token`
    /// - `DOOH_REQUEST_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a positive integer or no
    /// default token location can be resolved.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("DOOH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        );
        let token_file = match std::env::var_os("DOOH_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_token_file().ok_or(ConfigError::NoConfigDir)?,
        };
        let request_timeout =
            parse_timeout(std::env::var("DOOH_REQUEST_TIMEOUT_SECS").ok().as_deref())?;

        Ok(Self { base_url, token_file, request_timeout })
    }

    /// Same config pointed at another backend.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

/// `<config dir>/dooh-admin/token`, if the platform has a config dir.
#[must_use]
pub fn default_token_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(TOKEN_FILE_NAME))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::Parse(format!(
                "DOOH_REQUEST_TIMEOUT_SECS must be a positive integer, got '{value}'"
            ))),
        },
    }
}
