use std::{collections::HashMap, fs, path::Path, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_DATA_URL: &str =
    "https://mindfuleducation-cdn.s3.eu-west-1.amazonaws.com/misc/data.json";
pub const SETTINGS_FILE: &str = "partners.toml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid data url '{url}': {reason}")]
    InvalidDataUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// A zero timeout would fail every request immediately; it falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn parsed_data_url(&self) -> Result<Url, ConfigError> {
        parse_data_url(&self.data_url)
    }
}

/// Defaults, then `partners.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("data_url").and_then(toml::Value::as_str) {
                    settings.data_url = v.to_string();
                }
                if let Some(v) = file_cfg
                    .get("request_timeout_secs")
                    .and_then(toml::Value::as_integer)
                {
                    match u64::try_from(v) {
                        Ok(secs) if secs > 0 => settings.request_timeout_secs = secs,
                        _ => tracing::warn!(
                            "ignoring request_timeout_secs = {v} in '{}': must be a positive number of seconds",
                            path.display()
                        ),
                    }
                }
            }
            Err(err) => {
                tracing::warn!("ignoring unreadable settings file '{}': {err}", path.display());
            }
        }
    }

    if let Some(v) = env("PARTNERS_DATA_URL") {
        settings.data_url = v;
    }
    if let Some(v) = env("APP__DATA_URL") {
        settings.data_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => settings.request_timeout_secs = secs,
            _ => tracing::warn!(
                "ignoring APP__REQUEST_TIMEOUT_SECS='{v}': must be a positive number of seconds"
            ),
        }
    }

    settings
}

pub fn parse_data_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDataUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
