// crates/passport-gate-core/src/runtime/quota.rs
// ============================================================================
// Module: Quota Enforcer
// Description: Count-based product creation quota decisions.
// Purpose: Decide create requests against the tenant's entitlement cap.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The quota enforcer decides whether a batch of product creates fits within
//! the tenant's entitlement cap. Unlimited entitlements allow without a count
//! query. Bounded entitlements fetch the current count and allow only when
//! the whole batch fits; partial acceptance is disallowed at this layer.
//!
//! The count-then-insert sequence is not atomic against the external store:
//! two concurrent creates from one tenant can both observe the same count and
//! transiently overshoot the cap by the number of requests in flight. This is
//! an accepted weak-consistency window; the enforcer takes no locks. A hard
//! cap would have to live in the external store as a constraint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::decision::Decision;
use crate::core::decision::DenyReason;
use crate::core::entitlements::Entitlement;
use crate::core::entitlements::ProductLimit;
use crate::core::tenant::Tenant;
use crate::interfaces::TenantStore;
use crate::runtime::engine::PolicyError;

// ============================================================================
// SECTION: Enforcer
// ============================================================================

/// Decides product creation requests against entitlement caps.
pub struct QuotaEnforcer<'a, T: TenantStore> {
    /// Tenant store consulted for current product counts.
    store: &'a T,
}

impl<'a, T: TenantStore> QuotaEnforcer<'a, T> {
    /// Creates an enforcer over the given tenant store.
    #[must_use]
    pub const fn new(store: &'a T) -> Self {
        Self {
            store,
        }
    }

    /// Decides whether `requested` product creates fit within the cap.
    ///
    /// Denials carry the exact current count, requested batch size, and cap
    /// so callers can render an actionable message. Allows carry the capacity
    /// remaining after the batch.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Infrastructure`] when the count query fails.
    pub fn check_create(
        &self,
        tenant: &Tenant,
        entitlement: &Entitlement,
        requested: u32,
    ) -> Result<Decision, PolicyError> {
        let max = match entitlement.max_products {
            ProductLimit::Unlimited => return Ok(Decision::allow()),
            ProductLimit::Limited(max) => max,
        };
        let current = self.store.count_products(&tenant.tenant_id)?;
        if current.saturating_add(requested) <= max {
            let remaining = max.saturating_sub(current).saturating_sub(requested);
            Ok(Decision::allow_with_remaining(remaining))
        } else {
            Ok(Decision::deny(DenyReason::QuotaExceeded {
                current,
                requested,
                max,
            }))
        }
    }
}
