// crates/passport-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Tenant Resolver
// Description: Maps an authenticated identity to its owned tenant.
// Purpose: Enforce the one-owner-one-tenant invariant, failing closed.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The tenant resolver looks up the tenant owned by the calling identity
//! through the tenant store contract. An unauthenticated caller is rejected
//! before any store access. A missing tenant is an expected outcome for
//! onboarding flows, not an error. More than one tenant for a single owner is
//! an integrity violation and resolution fails closed rather than picking one
//! arbitrarily.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::tenant::Identity;
use crate::core::tenant::Tenant;
use crate::interfaces::TenantStore;
use crate::runtime::engine::PolicyError;

// ============================================================================
// SECTION: Resolution Outcome
// ============================================================================

/// Outcome of resolving the tenant owned by an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantResolution {
    /// Exactly one tenant is owned by the identity.
    Resolved(Tenant),
    /// The identity owns no tenant yet.
    NotFound,
    /// The identity is not authenticated; the store was never consulted.
    Unauthenticated,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves the tenant owned by the calling identity.
pub struct TenantResolver<'a, T: TenantStore> {
    /// Tenant store consulted for ownership rows.
    store: &'a T,
}

impl<'a, T: TenantStore> TenantResolver<'a, T> {
    /// Creates a resolver over the given tenant store.
    #[must_use]
    pub const fn new(store: &'a T) -> Self {
        Self {
            store,
        }
    }

    /// Resolves the tenant owned by `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Integrity`] when more than one tenant maps to
    /// the owner, and [`PolicyError::Infrastructure`] when the store lookup
    /// fails.
    pub fn resolve(&self, identity: &Identity) -> Result<TenantResolution, PolicyError> {
        if !identity.authenticated {
            return Ok(TenantResolution::Unauthenticated);
        }
        let mut tenants = self.store.tenants_for_owner(&identity.id)?;
        if tenants.len() > 1 {
            return Err(PolicyError::Integrity(format!(
                "owner {} maps to {} tenants",
                identity.id,
                tenants.len()
            )));
        }
        Ok(tenants.pop().map_or(TenantResolution::NotFound, TenantResolution::Resolved))
    }
}
