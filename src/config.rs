// Runtime configuration. Everything comes from environment variables so the
// API key never lives in the source; components receive the values they
// need at construction.

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DB_FILE_NAME: &str = "id_data.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer token for the vision endpoint. Only required for `process`.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub db_path: PathBuf,
}

impl Config {
    /// Build a config from the process environment.
    ///
    /// Recognised variables: `OPENAI_API_KEY`, `VISION_API_URL`,
    /// `VISION_MODEL`, `VISION_MAX_TOKENS`, `VISION_TIMEOUT_SECS` and
    /// `VISION_DB_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_tokens = match non_empty("VISION_MAX_TOKENS") {
            Some(v) => parse_positive("VISION_MAX_TOKENS", &v)?,
            None => DEFAULT_MAX_TOKENS,
        };
        let timeout_secs = match non_empty("VISION_TIMEOUT_SECS") {
            Some(v) => parse_positive("VISION_TIMEOUT_SECS", &v)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_key: non_empty("OPENAI_API_KEY"),
            endpoint: non_empty("VISION_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
            model: non_empty("VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
            db_path: non_empty("VISION_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

/// `<data_local_dir>/vision-ledger/id_data.db`, or `./id_data.db` when the
/// platform has no data directory.
pub fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("vision-ledger").join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + From<u8>,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::from(0) => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
