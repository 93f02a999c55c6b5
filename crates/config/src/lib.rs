//! # Config - Store Settings
//!
//! All settings come from environment variables, each with a default:
//!
//! ```text
//! RECSTORE_DB_PATH          data file path                        (default: "db-1x1.db")
//! RECSTORE_KEY_FIELDS       comma-separated key field positions   (default: "0,1")
//! RECSTORE_SCHEMA           name:len,... for creating a new file  (default: unset)
//! RECSTORE_MAGIC            magic for newly created files         (default: 0x00002020)
//! RECSTORE_LOCK_TIMEOUT_MS  lock wait limit, 0 = wait forever     (default: 0)
//! ```
//!
//! A variable that is set but cannot be parsed is an error rather than a
//! silent fallback to the default.

use std::path::PathBuf;
use std::time::Duration;

use datafile::{FieldSchema, DEFAULT_MAGIC};
use thiserror::Error;

pub const ENV_DB_PATH: &str = "RECSTORE_DB_PATH";
pub const ENV_KEY_FIELDS: &str = "RECSTORE_KEY_FIELDS";
pub const ENV_SCHEMA: &str = "RECSTORE_SCHEMA";
pub const ENV_MAGIC: &str = "RECSTORE_MAGIC";
pub const ENV_LOCK_TIMEOUT_MS: &str = "RECSTORE_LOCK_TIMEOUT_MS";

pub const DEFAULT_DB_PATH: &str = "db-1x1.db";

/// Key columns used when none are configured: the first two.
pub const DEFAULT_KEY_FIELDS: [usize; 2] = [0, 1];

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings for opening a record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Data file location.
    pub data_path: PathBuf,
    /// Schema positions that together form a record's unique key.
    pub key_fields: Vec<usize>,
    /// Schema used to create the data file when it does not exist yet.
    /// `None` means a missing file is an error.
    pub schema: Option<Vec<FieldSchema>>,
    /// Magic number written into newly created files.
    pub magic: i32,
    /// Upper bound on how long `lock` may block. `None` waits forever.
    pub lock_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DB_PATH),
            key_fields: DEFAULT_KEY_FIELDS.to_vec(),
            schema: None,
            magic: DEFAULT_MAGIC,
            lock_timeout: None,
        }
    }
}

impl StoreConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` if it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            cfg.data_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_KEY_FIELDS) {
            cfg.key_fields = parse_key_fields(&raw)?;
        }
        if let Some(raw) = lookup(ENV_SCHEMA) {
            cfg.schema = Some(parse_schema(&raw)?);
        }
        if let Some(raw) = lookup(ENV_MAGIC) {
            cfg.magic = parse_magic(&raw)?;
        }
        if let Some(raw) = lookup(ENV_LOCK_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|e| invalid(ENV_LOCK_TIMEOUT_MS, &raw, e))?;
            cfg.lock_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        Ok(cfg)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// `"0,1"` → `[0, 1]`. Empty input means no key columns.
pub fn parse_key_fields(raw: &str) -> Result<Vec<usize>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|e| invalid(ENV_KEY_FIELDS, raw, e)))
        .collect()
}

/// `"name:32,city:16"` → two [`FieldSchema`]s.
pub fn parse_schema(raw: &str) -> Result<Vec<FieldSchema>, ConfigError> {
    let fields = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|spec| {
            let (name, len) = spec
                .split_once(':')
                .ok_or_else(|| invalid(ENV_SCHEMA, raw, format!("expected name:len, got {:?}", spec)))?;
            let length: u16 = len.trim().parse().map_err(|e| invalid(ENV_SCHEMA, raw, e))?;
            if length == 0 {
                return Err(invalid(ENV_SCHEMA, raw, format!("field {:?} has zero length", name)));
            }
            Ok(FieldSchema::new(name.trim(), length))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err(invalid(ENV_SCHEMA, raw, "schema has no fields"));
    }
    Ok(fields)
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
pub fn parse_magic(raw: &str) -> Result<i32, ConfigError> {
    let s = raw.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32),
        None => s.parse::<i32>(),
    };
    parsed.map_err(|e| invalid(ENV_MAGIC, raw, e))
}
