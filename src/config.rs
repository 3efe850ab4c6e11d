use std::env::{self, VarError};
use std::time::Duration;

use crate::api_client::DEFAULT_TIMEOUT;
use crate::error::{ConfigError, EnvVarError, Error};

pub const API_KEY_VAR: &str = "F1_API_KEY";
pub const BASE_URL_VAR: &str = "F1_API_BASE_URL";
pub const HOST_VAR: &str = "F1_API_HOST";
pub const TIMEOUT_VAR: &str = "F1_API_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://f1-motorsport-data.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "f1-motorsport-data.p.rapidapi.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub host: String,
    pub timeout: Duration,
}

impl Config {
    // requires F1_API_KEY env var
    // can use dotenv
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| env::var(var))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let api_key = lookup(API_KEY_VAR)
            .and_then(|key| {
                if key.trim().is_empty() {
                    Err(VarError::NotPresent)
                } else {
                    Ok(key)
                }
            })
            .map_err(|e| EnvVarError::new(API_KEY_VAR, e))?;

        let optional = |var: &str, default: &str| match lookup(var) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => default.to_string(),
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: raw,
                    }
                    .into())
                }
            },
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_key,
            base_url: optional(BASE_URL_VAR, DEFAULT_BASE_URL),
            host: optional(HOST_VAR, DEFAULT_HOST),
            timeout,
        })
    }
}
