//! Settings command surface for the desktop panel.
//!
//! # Responsibilities
//! - `get_configuration`: raw config snapshot for display (unvalidated,
//!   so the panel can show a broken file for editing)
//! - `save_value`: typed update of one global scalar setting
//!
//! # Design Decisions
//! - The store is an opaque key-value surface over the TOML file; rule
//!   editing happens through full file writes elsewhere
//! - Updates edit the raw TOML table, never a typed round-trip, so keys
//!   the engine's schema does not model survive a rewrite
//! - An empty value clears the setting back to its default
//! - Unknown setting names report `false` rather than erroring, matching
//!   the panel contract

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use toml::{Table, Value};

use crate::config::schema::ProxyConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration file not found at {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value '{value}' for setting '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Key-value settings store backed by the proxy's TOML config file.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the raw configuration for display.
    ///
    /// Deliberately skips semantic validation: the panel must be able to
    /// render a config the loader would refuse to activate.
    pub fn get_configuration(&self) -> Result<ProxyConfig, SettingsError> {
        let content = self.read()?;
        Ok(toml::from_str(&content)?)
    }

    /// Update one global scalar setting and rewrite the file.
    ///
    /// Returns `true` if the setting name was recognized and persisted.
    /// Operates on the raw TOML table: keys outside the engine's schema
    /// are carried through the rewrite untouched.
    pub fn save_value(&self, name: &str, value: &str) -> Result<bool, SettingsError> {
        let Some(kind) = setting_kind(name) else {
            tracing::warn!(setting = %name, "Ignoring unknown setting name");
            return Ok(false);
        };

        let content = self.read()?;
        let mut table: Table = toml::from_str(&content)?;
        if value.is_empty() {
            table.remove(name);
        } else {
            table.insert(name.to_string(), encode_value(kind, name, value)?);
        }

        let serialized = toml::to_string(&table)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(serialized.as_bytes())?;

        tracing::info!(setting = %name, "Setting saved");
        Ok(true)
    }

    fn read(&self) -> Result<String, SettingsError> {
        if !self.path.is_file() {
            return Err(SettingsError::NotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Accepted value shape for one global setting name.
#[derive(Clone, Copy)]
enum ValueKind {
    Text,
    Flag,
    Port,
    Number,
}

/// Map a setting name to its value shape; `None` for unknown names.
fn setting_kind(name: &str) -> Option<ValueKind> {
    Some(match name {
        "listening_address" | "logging_level" | "compression_flags" => ValueKind::Text,
        "add_caching"
        | "add_rate_limiting"
        | "add_logging"
        | "add_sql_injection_protection"
        | "enable_compression"
        | "disable_default_body_limit" => ValueKind::Flag,
        "listening_port_http" | "listening_port_https" | "proxy_timeout" => ValueKind::Port,
        "recv_buffer_size"
        | "send_buffer_size"
        | "ip_ttl"
        | "tcp_keep_alive_seconds"
        | "max_backlog" => ValueKind::Number,
        _ => return None,
    })
}

fn encode_value(kind: ValueKind, name: &str, value: &str) -> Result<Value, SettingsError> {
    let invalid = || SettingsError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    };
    Ok(match kind {
        ValueKind::Text => Value::String(value.to_string()),
        ValueKind::Flag => Value::Boolean(value.parse::<bool>().map_err(|_| invalid())?),
        ValueKind::Port => {
            Value::Integer(i64::from(value.parse::<u16>().map_err(|_| invalid())?))
        }
        ValueKind::Number => Value::Integer(value.parse::<i64>().map_err(|_| invalid())?),
    })
}
