// crates/passport-gate-core/src/core/entitlements.rs
// ============================================================================
// Module: Passport Gate Entitlements
// Description: Derived entitlement sets and the rule table that produces them.
// Purpose: Provide pure, deterministic entitlement resolution per tenant.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entitlements are derived, never persisted: a pure function of a tenant
//! snapshot. The built-in rule table gates everything on the binary
//! active/not-active subscription split; per-plan overrides may be layered on
//! for active tenants via configuration without changing the built-in rules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::tenant::PlanName;
use crate::core::tenant::Tenant;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default product cap for tenants without an active subscription.
pub const DEFAULT_FREE_TIER_MAX_PRODUCTS: u32 = 10;

// ============================================================================
// SECTION: Entitlement Values
// ============================================================================

/// Product creation limit attached to an entitlement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLimit {
    /// Capped at the given number of products.
    Limited(u32),
    /// No cap on product count.
    Unlimited,
}

impl ProductLimit {
    /// Returns the numeric cap when the limit is bounded.
    #[must_use]
    pub const fn as_limit(self) -> Option<u32> {
        match self {
            Self::Limited(max) => Some(max),
            Self::Unlimited => None,
        }
    }
}

/// Feature-gated capabilities beyond raw CRUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Uploading certificates to components.
    Certificates,
    /// Editing compliance fields on products.
    ComplianceEditing,
    /// Removing platform branding from public pages.
    BrandingRemoval,
    /// Setting a non-default brand color.
    BrandColor,
}

impl Feature {
    /// Returns a stable label for audit records and caller messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Certificates => "certificates",
            Self::ComplianceEditing => "compliance_editing",
            Self::BrandingRemoval => "branding_removal",
            Self::BrandColor => "brand_color",
        }
    }
}

/// Entitlement set unlocked by a tenant's current subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Product creation cap.
    pub max_products: ProductLimit,
    /// Whether certificate uploads are allowed.
    pub can_upload_certificates: bool,
    /// Whether compliance fields may be edited.
    pub can_edit_compliance: bool,
    /// Whether platform branding may be removed.
    pub can_remove_branding: bool,
    /// Whether a non-default brand color may be set.
    pub can_set_brand_color: bool,
}

impl Entitlement {
    /// Free-tier entitlements: capped products, no paid features.
    #[must_use]
    pub const fn free_tier(max_products: u32) -> Self {
        Self {
            max_products: ProductLimit::Limited(max_products),
            can_upload_certificates: false,
            can_edit_compliance: false,
            can_remove_branding: false,
            can_set_brand_color: false,
        }
    }

    /// Full entitlements: unlimited products, every feature enabled.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            max_products: ProductLimit::Unlimited,
            can_upload_certificates: true,
            can_edit_compliance: true,
            can_remove_branding: true,
            can_set_brand_color: true,
        }
    }

    /// Returns true when the entitlement set allows the feature.
    #[must_use]
    pub const fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Certificates => self.can_upload_certificates,
            Feature::ComplianceEditing => self.can_edit_compliance,
            Feature::BrandingRemoval => self.can_remove_branding,
            Feature::BrandColor => self.can_set_brand_color,
        }
    }
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Entitlement rule table evaluated per tenant snapshot.
///
/// # Invariants
/// - Resolution is a pure function of the tenant snapshot: no storage access,
///   no side effects, identical results for identical inputs.
/// - Tenants without an active subscription always receive the free-tier set;
///   plan overrides apply to active tenants only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementRules {
    /// Product cap applied to tenants without an active subscription.
    free_tier_max_products: u32,
    /// Per-plan overrides for active tenants.
    plan_overrides: BTreeMap<PlanName, Entitlement>,
}

impl Default for EntitlementRules {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_TIER_MAX_PRODUCTS)
    }
}

impl EntitlementRules {
    /// Creates the built-in rule table with the given free-tier product cap.
    #[must_use]
    pub const fn new(free_tier_max_products: u32) -> Self {
        Self {
            free_tier_max_products,
            plan_overrides: BTreeMap::new(),
        }
    }

    /// Adds a per-plan override applied when an active tenant is on `plan`.
    #[must_use]
    pub fn with_plan_override(mut self, plan: PlanName, entitlement: Entitlement) -> Self {
        self.plan_overrides.insert(plan, entitlement);
        self
    }

    /// Returns the configured free-tier product cap.
    #[must_use]
    pub const fn free_tier_max_products(&self) -> u32 {
        self.free_tier_max_products
    }

    /// Resolves the entitlement set for a tenant snapshot.
    #[must_use]
    pub fn resolve(&self, tenant: &Tenant) -> Entitlement {
        if !tenant.subscription_status.is_active() {
            return Entitlement::free_tier(self.free_tier_max_products);
        }
        self.plan_overrides.get(&tenant.plan_name).copied().unwrap_or_else(Entitlement::full)
    }
}
