// crates/passport-gate-core/src/runtime/ownership.rs
// ============================================================================
// Module: Resource Ownership Guard
// Description: Transitive ownership chain walking for catalog resources.
// Purpose: Confirm a resource belongs to a tenant before any read or mutation.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The ownership guard walks the foreign-key chain of a referenced resource
//! back to its owning tenant using read-only fetches: products and suppliers
//! match `brand_id` directly, components load their product first, and
//! certificates load their component and then its product. A missing link and
//! a chain terminating at a different tenant are reported as the same
//! outcome, so a denial never reveals whether the resource exists.
//!
//! Every call re-walks the chain fully; calls are request-scoped, so no
//! partial-chain caching is kept.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::resource::Resource;
use crate::core::resource::ResourceRef;
use crate::core::tenant::Tenant;
use crate::interfaces::ResourceStore;
use crate::runtime::engine::PolicyError;

// ============================================================================
// SECTION: Check Outcome
// ============================================================================

/// Outcome of an ownership chain walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipCheck {
    /// The chain resolved to the tenant; the resolved row is returned so
    /// callers avoid a second fetch.
    Owned(Resource),
    /// The resource is missing or owned by another tenant.
    NotFoundOrForbidden,
}

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Walks ownership chains against the resource store contract.
pub struct OwnershipGuard<'a, R: ResourceStore> {
    /// Resource store consulted for chain links.
    store: &'a R,
}

impl<'a, R: ResourceStore> OwnershipGuard<'a, R> {
    /// Creates a guard over the given resource store.
    #[must_use]
    pub const fn new(store: &'a R) -> Self {
        Self {
            store,
        }
    }

    /// Confirms the referenced resource transitively belongs to `tenant`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Infrastructure`] when a chain read fails.
    pub fn assert_owned(
        &self,
        tenant: &Tenant,
        resource: &ResourceRef,
    ) -> Result<OwnershipCheck, PolicyError> {
        match resource {
            ResourceRef::Product(product_id) => {
                let Some(product) = self.store.product(product_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                if product.brand_id != tenant.tenant_id {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                }
                Ok(OwnershipCheck::Owned(Resource::Product(product)))
            }
            ResourceRef::Component(component_id) => {
                let Some(component) = self.store.component(component_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                let Some(product) = self.store.product(&component.product_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                if product.brand_id != tenant.tenant_id {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                }
                Ok(OwnershipCheck::Owned(Resource::Component(component)))
            }
            ResourceRef::Certificate(certificate_id) => {
                let Some(certificate) = self.store.certificate(certificate_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                let Some(component) = self.store.component(&certificate.component_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                let Some(product) = self.store.product(&component.product_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                if product.brand_id != tenant.tenant_id {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                }
                Ok(OwnershipCheck::Owned(Resource::Certificate(certificate)))
            }
            ResourceRef::Supplier(supplier_id) => {
                let Some(supplier) = self.store.supplier(supplier_id)? else {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                };
                if supplier.brand_id != tenant.tenant_id {
                    return Ok(OwnershipCheck::NotFoundOrForbidden);
                }
                Ok(OwnershipCheck::Owned(Resource::Supplier(supplier)))
            }
        }
    }
}
