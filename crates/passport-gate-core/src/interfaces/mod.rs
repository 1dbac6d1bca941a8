// crates/passport-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Passport Gate Interfaces
// Description: Backend-agnostic interfaces for identity and catalog storage.
// Purpose: Define the contract surfaces consumed by the policy engine runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the policy engine reads identity and catalog state
//! without embedding backend-specific details. Implementations must be
//! deterministic for a given store snapshot and fail closed on missing or
//! invalid data. The engine only reads through these traits; all writes
//! happen downstream of an allow decision, performed by the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::CertificateId;
use crate::core::identifiers::ComponentId;
use crate::core::identifiers::IdentityId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::SupplierId;
use crate::core::identifiers::TenantId;
use crate::core::resource::Certificate;
use crate::core::resource::Component;
use crate::core::resource::Product;
use crate::core::resource::Supplier;
use crate::core::tenant::Identity;
use crate::core::tenant::Tenant;

// ============================================================================
// SECTION: Identity Provider
// ============================================================================

/// Identity provider errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No authenticated session exists.
    #[error("no authenticated identity")]
    Unauthenticated,
    /// Identity provider reported an error.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Session-backed identity provider.
pub trait IdentityProvider {
    /// Resolves the identity making the current request.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when no session exists or the provider fails.
    fn current_identity(&self) -> Result<Identity, IdentityError>;
}

// ============================================================================
// SECTION: Catalog Stores
// ============================================================================

/// Catalog store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("catalog store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("catalog store corruption: {0}")]
    Corrupt(String),
    /// Store data is invalid.
    #[error("catalog store invalid data: {0}")]
    Invalid(String),
    /// A uniqueness constraint rejected the write.
    #[error("catalog store unique constraint violation: {0}")]
    UniqueViolation(String),
    /// Store reported an error.
    #[error("catalog store error: {0}")]
    Store(String),
}

/// Tenant store for ownership lookups and product counting.
pub trait TenantStore {
    /// Returns every tenant owned by the identity.
    ///
    /// At most one row must exist per owner; returning the full list lets the
    /// resolver detect duplicate-owner integrity violations instead of
    /// silently picking one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn tenants_for_owner(&self, owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError>;

    /// Inserts a new tenant row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] when the owner already has a
    /// tenant; the storage constraint is the final arbiter for the
    /// tenant-per-owner invariant. Returns other [`StoreError`] variants on
    /// I/O failure.
    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError>;

    /// Counts the products currently owned by the tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the count query fails.
    fn count_products(&self, tenant_id: &TenantId) -> Result<u32, StoreError>;
}

/// Resource store for read-only ownership chain walking.
pub trait ResourceStore {
    /// Loads a product row by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Loads a component row by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn component(&self, component_id: &ComponentId) -> Result<Option<Component>, StoreError>;

    /// Loads a certificate row by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn certificate(&self, certificate_id: &CertificateId)
    -> Result<Option<Certificate>, StoreError>;

    /// Loads a supplier row by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn supplier(&self, supplier_id: &SupplierId) -> Result<Option<Supplier>, StoreError>;
}
