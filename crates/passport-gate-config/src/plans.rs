// crates/passport-gate-config/src/plans.rs
// ============================================================================
// Module: Plan Override Configuration
// Description: Per-plan entitlement overrides parsed from config.
// Purpose: Compile plan tables into the entitlement rule table.
// Dependencies: passport-gate-core, serde
// ============================================================================

//! ## Overview
//! Plan overrides let operators tune what an active subscription on a named
//! plan unlocks. Overrides compile into the core rule table; tenants without
//! an active subscription never see them. Unknown plan names and zero product
//! caps are rejected so a typo cannot silently widen or erase a limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use passport_gate_core::Entitlement;
use passport_gate_core::EntitlementRules;
use passport_gate_core::PlanName;
use passport_gate_core::ProductLimit;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::config::MAX_PRODUCT_CAP;

// ============================================================================
// SECTION: Plan Override Types
// ============================================================================

/// Product limit as written in config: a count or the `"unlimited"` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlanLimitConfig {
    /// Bounded product cap.
    Count(u32),
    /// Keyword limit; only `"unlimited"` is accepted.
    Keyword(String),
}

/// Entitlement override for a single named plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanOverrideConfig {
    /// Product creation cap for the plan.
    pub max_products: PlanLimitConfig,
    /// Whether certificate uploads are allowed.
    #[serde(default)]
    pub can_upload_certificates: bool,
    /// Whether compliance fields may be edited.
    #[serde(default)]
    pub can_edit_compliance: bool,
    /// Whether platform branding may be removed.
    #[serde(default)]
    pub can_remove_branding: bool,
    /// Whether a non-default brand color may be set.
    #[serde(default)]
    pub can_set_brand_color: bool,
}

impl PlanOverrideConfig {
    /// Validates the override for the named plan.
    pub(crate) fn validate(&self, plan: &str) -> Result<(), ConfigError> {
        self.to_entitlement(plan).map(|_| ())
    }

    /// Converts the override into a core entitlement set.
    pub(crate) fn to_entitlement(&self, plan: &str) -> Result<Entitlement, ConfigError> {
        let max_products = match &self.max_products {
            PlanLimitConfig::Count(0) => {
                return Err(ConfigError::Invalid(format!(
                    "plans.{plan}.max_products must be greater than zero",
                )));
            }
            PlanLimitConfig::Count(count) if *count > MAX_PRODUCT_CAP => {
                return Err(ConfigError::Invalid(format!(
                    "plans.{plan}.max_products out of range",
                )));
            }
            PlanLimitConfig::Count(count) => ProductLimit::Limited(*count),
            PlanLimitConfig::Keyword(keyword) if keyword == "unlimited" => {
                ProductLimit::Unlimited
            }
            PlanLimitConfig::Keyword(keyword) => {
                return Err(ConfigError::Invalid(format!(
                    "plans.{plan}.max_products keyword must be \"unlimited\", got \"{keyword}\"",
                )));
            }
        };
        Ok(Entitlement {
            max_products,
            can_upload_certificates: self.can_upload_certificates,
            can_edit_compliance: self.can_edit_compliance,
            can_remove_branding: self.can_remove_branding,
            can_set_brand_color: self.can_set_brand_color,
        })
    }
}

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Parses a config plan key into a known plan name.
pub(crate) fn parse_plan_name(name: &str) -> Result<PlanName, ConfigError> {
    match name {
        "free" => Ok(PlanName::Free),
        "starter" => Ok(PlanName::Starter),
        "pro" => Ok(PlanName::Pro),
        "enterprise" => Ok(PlanName::Enterprise),
        other => Err(ConfigError::Invalid(format!("unknown plan name: {other}"))),
    }
}

/// Compiles the quota cap and plan overrides into an entitlement rule table.
pub(crate) fn compile_rules(
    free_tier_max_products: u32,
    plans: &BTreeMap<String, PlanOverrideConfig>,
) -> Result<EntitlementRules, ConfigError> {
    let mut rules = EntitlementRules::new(free_tier_max_products);
    for (name, plan) in plans {
        let plan_name = parse_plan_name(name)?;
        rules = rules.with_plan_override(plan_name, plan.to_entitlement(name)?);
    }
    Ok(rules)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
