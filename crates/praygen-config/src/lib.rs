//! Immutable client configuration for the praygen suggestion pipeline.
//!
//! Configuration is resolved once from a [`Settings`] source and never
//! mutated afterwards. A request in flight always sees the config it
//! started with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical setting keys consumed by [`resolve`].
pub const KEY_API_KEY: &str = "api_key";
pub const KEY_BASE_URL: &str = "base_url";
pub const KEY_MODEL: &str = "model";
pub const KEY_TRANSLATION: &str = "translation";

/// Baseline model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Baseline scripture translation when none is configured.
pub const DEFAULT_TRANSLATION: &str = "esv";

/// Translation codes the upstream service is known to accept. Informational
/// only (CLI help text); unknown codes are passed through untouched because
/// the upstream service, not this client, is authoritative on valid codes.
pub const KNOWN_TRANSLATIONS: &[&str] = &["esv", "niv", "kjv"];

/// Source of named string settings.
///
/// Concrete sources live with the caller: the CLI reads the process
/// environment, tests hand in an explicit map.
pub trait Settings {
    fn get(&self, key: &str) -> Option<String>;
}

/// Explicit in-memory settings, mainly for tests and embedding callers.
#[derive(Clone, Debug, Default)]
pub struct MapSettings {
    values: BTreeMap<String, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl Settings for MapSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Reads settings from the process environment under the `PRAYGEN_` prefix
/// (`api_key` becomes `PRAYGEN_API_KEY`, and so on).
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSettings;

impl Settings for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(env_var_name(key)).ok()
    }
}

fn env_var_name(key: &str) -> String {
    format!("PRAYGEN_{}", key.to_ascii_uppercase())
}

/// Resolved, immutable client configuration.
///
/// One `ClientConfig` is shared read-only across many suggestion calls;
/// it is plain owned data, safe for unsynchronized concurrent reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer credential for the upstream service.
    pub api_key: String,
    /// Normalized absolute base URL (scheme present, no trailing slash).
    pub base_url: String,
    /// Model identifier, passed as a request parameter.
    pub model: String,
    /// Scripture translation code, passed as a request parameter.
    pub translation: String,
}

impl ClientConfig {
    /// Full chat-completions endpoint for this config.
    ///
    /// The base URL may already name the endpoint; in that case it is used
    /// as-is rather than doubled up.
    pub fn completions_url(&self) -> String {
        if self.base_url.ends_with("/chat/completions") {
            self.base_url.clone()
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

/// Configuration resolution failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    MissingRequired { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired { field } => {
                write!(f, "[config] required setting is missing or empty: {field}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve a [`ClientConfig`] from a settings source.
///
/// Pure: identical settings always yield an identical config. Required
/// fields are never silently defaulted.
pub fn resolve(settings: &impl Settings) -> Result<ClientConfig, ConfigError> {
    let api_key = required(settings, KEY_API_KEY)?;
    let base_url = normalize_base_url(&required(settings, KEY_BASE_URL)?);
    let model = optional(settings, KEY_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let translation =
        optional(settings, KEY_TRANSLATION).unwrap_or_else(|| DEFAULT_TRANSLATION.to_string());

    Ok(ClientConfig {
        api_key,
        base_url,
        model,
        translation,
    })
}

fn required(settings: &impl Settings, field: &'static str) -> Result<String, ConfigError> {
    optional(settings, field).ok_or(ConfigError::MissingRequired { field })
}

fn optional(settings: &impl Settings, key: &str) -> Option<String> {
    settings
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalize a base URL the way operators actually write them: add the
/// scheme when missing, drop trailing slashes.
fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    let lower = url.to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        url = format!("https://{url}");
    }
    url.trim_end_matches('/').to_string()
}
