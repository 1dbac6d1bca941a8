//! Config defaults and core validation tests for passport-gate-config.
// crates/passport-gate-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Defaults and Core Validation Tests
// Description: Validate default behavior and core config invariants.
// Purpose: Ensure minimal config is valid and critical invariants are enforced.
// ============================================================================

use passport_gate_config::AuditSinkKind;
use passport_gate_config::ConfigError;
use passport_gate_config::StoreBackend;
use passport_gate_core::EntitlementRules;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn quota_defaults_to_ten_products() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.quota.free_tier_max_products != 10 {
        return Err("quota.free_tier_max_products should default to 10".to_string());
    }
    Ok(())
}

#[test]
fn default_rules_match_the_builtin_table() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let rules = config.entitlement_rules().map_err(|err| err.to_string())?;
    if rules != EntitlementRules::default() {
        return Err("default config should compile to the built-in rule table".to_string());
    }
    Ok(())
}

#[test]
fn store_defaults_to_memory_backend() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.store.backend != StoreBackend::Memory {
        return Err("store.type should default to memory".to_string());
    }
    if config.store.busy_timeout_ms != 5_000 {
        return Err("store.busy_timeout_ms should default to 5000".to_string());
    }
    Ok(())
}

#[test]
fn audit_defaults_to_no_sink() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit.sink should default to none".to_string());
    }
    if config.audit.path.is_some() {
        return Err("audit.path should default to unset".to_string());
    }
    Ok(())
}

#[test]
fn quota_zero_cap_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.quota.free_tier_max_products = 0;
    assert_invalid(config.validate(), "quota.free_tier_max_products must be greater than zero")
}

#[test]
fn quota_oversized_cap_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.quota.free_tier_max_products = 2_000_000;
    assert_invalid(config.validate(), "quota.free_tier_max_products out of range")
}
