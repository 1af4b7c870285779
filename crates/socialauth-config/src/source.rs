//! Configuration sources consulted by the settings facades.
//!
//! # Design
//! - `ConfigProvider` is the single lookup seam; facades never read globals.
//! - Missing keys resolve to the caller's default instead of failing.
//! - Hosts can replace lookup entirely with a `GetterOverride`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{ConfigError, ConfigResult};

/// Key/value capability backing the settings facades.
pub trait ConfigProvider: Send + Sync {
    /// Return the value stored under `key`, or `default` when it is absent.
    fn get(&self, key: &str, default: Value) -> Value;
}

/// In-memory settings document keyed by fully prefixed setting names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsMap {
    values: Map<String, Value>,
}

impl SettingsMap {
    /// Create an empty settings document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when `value` is not a JSON object.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ConfigError::InvalidField {
                section: "settings".to_string(),
                field: "<root>".to_string(),
                value: Some(other.to_string()),
                reason: "settings document must be an object",
            }),
        }
    }

    /// Parse a JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not an object.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let value = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            operation: "settings.parse",
            source,
        })?;
        Self::from_value(value)
    }

    /// Load a JSON settings document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a JSON object.
    #[instrument(name = "settings.load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            operation: "settings.read",
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        debug!(keys = settings.len(), "loaded settings document");
        Ok(settings)
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a setting, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Number of settings stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no settings are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigProvider for SettingsMap {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }
}

/// Settings read from environment variables.
///
/// Values that parse as JSON (`true`, `42`, `{"a": 1}`) are used as such;
/// anything else is taken as a plain string.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    prefix: String,
    values: Map<String, Value>,
}

impl EnvSettings {
    /// Snapshot the current process environment.
    ///
    /// `prefix` is prepended to every setting key when looking it up, so a
    /// prefix of `APP_` maps `SOCIALACCOUNT_AUTO_SIGNUP` to
    /// `APP_SOCIALACCOUNT_AUTO_SIGNUP`.
    #[must_use]
    pub fn from_process(prefix: impl Into<String>) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Build from an explicit list of variables.
    #[must_use]
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let values = vars
            .into_iter()
            .map(|(key, raw)| (key.into(), parse_env_value(raw.as_ref())))
            .collect();
        Self {
            prefix: prefix.into(),
            values,
        }
    }
}

impl ConfigProvider for EnvSettings {
    fn get(&self, key: &str, default: Value) -> Value {
        let name = format!("{}{key}", self.prefix);
        self.values.get(&name).cloned().unwrap_or(default)
    }
}

fn parse_env_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

type GetterFn = dyn Fn(&str, Value) -> Value + Send + Sync;

/// Host-registered getter that replaces the default lookup.
///
/// The getter receives the full setting key and the default, and its return
/// value is used verbatim.
#[derive(Clone)]
pub struct GetterOverride {
    getter: Arc<GetterFn>,
}

impl GetterOverride {
    /// Register a getter function.
    #[must_use]
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn(&str, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
        }
    }

    /// Getter that consults `getter` first and falls back to `fallback`
    /// when it yields nothing.
    #[must_use]
    pub fn layered<P, F>(fallback: P, getter: F) -> Self
    where
        P: ConfigProvider + 'static,
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self::new(move |key, default| getter(key).unwrap_or_else(|| fallback.get(key, default)))
    }
}

impl fmt::Debug for GetterOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterOverride").finish_non_exhaustive()
    }
}

impl ConfigProvider for GetterOverride {
    fn get(&self, key: &str, default: Value) -> Value {
        (self.getter)(key, default)
    }
}
