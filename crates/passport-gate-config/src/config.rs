// crates/passport-gate-config/src/config.rs
// ============================================================================
// Module: Passport Gate Configuration
// Description: Configuration loading and validation for Passport Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: passport-gate-core, passport-gate-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a config that cannot be
//! parsed and validated in full never produces a running policy engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use passport_gate_core::DEFAULT_FREE_TIER_MAX_PRODUCTS;
use passport_gate_core::EntitlementRules;
use passport_gate_store_sqlite::SqliteStoreConfig;
use passport_gate_store_sqlite::SqliteStoreMode;
use passport_gate_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

use crate::plans::PlanOverrideConfig;
use crate::plans::compile_rules;
use crate::plans::parse_plan_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "passport-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "PASSPORT_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed store busy timeout in milliseconds.
pub(crate) const MIN_STORE_BUSY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed store busy timeout in milliseconds.
pub(crate) const MAX_STORE_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Maximum accepted product cap for quota and plan limits.
pub(crate) const MAX_PRODUCT_CAP: u32 = 1_000_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Passport Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassportGateConfig {
    /// Free-tier quota configuration.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Per-plan entitlement overrides keyed by plan name.
    #[serde(default)]
    pub plans: BTreeMap<String, PlanOverrideConfig>,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Catalog store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl PassportGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// An explicit `path` wins over the `PASSPORT_GATE_CONFIG` environment
    /// variable, which wins over `passport-gate.toml` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quota.validate()?;
        self.audit.validate()?;
        self.store.validate()?;
        for (name, plan) in &self.plans {
            parse_plan_name(name)?;
            plan.validate(name)?;
        }
        Ok(())
    }

    /// Compiles the configured quota cap and plan overrides into a rule table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a plan entry cannot be compiled.
    pub fn entitlement_rules(&self) -> Result<EntitlementRules, ConfigError> {
        compile_rules(self.quota.free_tier_max_products, &self.plans)
    }
}

/// Free-tier quota configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    /// Product cap applied to tenants without an active subscription.
    #[serde(default = "default_free_tier_max_products")]
    pub free_tier_max_products: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_tier_max_products: default_free_tier_max_products(),
        }
    }
}

impl QuotaConfig {
    /// Validates quota configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.free_tier_max_products == 0 {
            return Err(ConfigError::Invalid(
                "quota.free_tier_max_products must be greater than zero".to_string(),
            ));
        }
        if self.free_tier_max_products > MAX_PRODUCT_CAP {
            return Err(ConfigError::Invalid(
                "quota.free_tier_max_products out of range".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit sink backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// Buffer audit events in memory.
    Memory,
    /// Append audit events as JSON lines to a file.
    Jsonl,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Audit sink backend.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output file path when using the jsonl sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.sink {
            AuditSinkKind::Jsonl => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("jsonl audit sink requires path".to_string())
                })?;
                validate_path_string("audit.path", path)
            }
            AuditSinkKind::None | AuditSinkKind::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "audit.path only allowed when audit.sink=jsonl".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Catalog store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Use the in-memory catalog store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Catalog store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub backend: StoreBackend,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates catalog store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StoreBackend::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            StoreBackend::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_store_path(path)?;
                validate_timeout_range(
                    "store.busy_timeout_ms",
                    self.busy_timeout_ms,
                    MIN_STORE_BUSY_TIMEOUT_MS,
                    MAX_STORE_BUSY_TIMEOUT_MS,
                )
            }
        }
    }

    /// Builds the `SQLite` store configuration from this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the sqlite backend has no path configured.
    pub fn sqlite_config(&self) -> Result<SqliteStoreConfig, ConfigError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
        Ok(SqliteStoreConfig {
            path: path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from explicit argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates catalog store paths against security limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("store path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("store path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a timeout value against bounds.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Default free-tier product cap.
pub(crate) const fn default_free_tier_max_products() -> u32 {
    DEFAULT_FREE_TIER_MAX_PRODUCTS
}

/// Default busy timeout for the `SQLite` store (ms).
pub(crate) const fn default_store_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn validate_path_string_accepts_valid_path() {
        assert!(validate_path_string("audit.path", "audit/decisions.jsonl").is_ok());
    }

    #[test]
    fn validate_path_string_rejects_empty_string() {
        let error = validate_path_string("audit.path", "   ").unwrap_err();
        assert!(error.to_string().contains("audit.path must be non-empty"));
    }

    #[test]
    fn validate_path_string_rejects_exceeds_max_length() {
        let long = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        let error = validate_path_string("audit.path", &long).unwrap_err();
        assert!(error.to_string().contains("exceeds max length"));
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let component = "b".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let value = format!("audit/{component}");
        let error = validate_path_string("audit.path", &value).unwrap_err();
        assert!(error.to_string().contains("path component too long"));
    }

    #[test]
    fn validate_timeout_range_enforces_bounds() {
        assert!(validate_timeout_range("store.busy_timeout_ms", 5_000, 100, 60_000).is_ok());
        assert!(validate_timeout_range("store.busy_timeout_ms", 99, 100, 60_000).is_err());
        assert!(validate_timeout_range("store.busy_timeout_ms", 60_001, 100, 60_000).is_err());
    }

    #[test]
    fn default_quota_matches_free_tier_cap() {
        assert_eq!(QuotaConfig::default().free_tier_max_products, 10);
    }
}
