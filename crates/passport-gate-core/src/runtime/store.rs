// crates/passport-gate-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Catalog Store
// Description: Simple in-memory catalog store for tests and demos.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`TenantStore`]
//! and [`ResourceStore`] for tests and local demos. It enforces the
//! owner-uniqueness constraint on tenant insert the same way a durable store
//! does, so the engine's constraint-as-arbiter handling can be exercised
//! without a database. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

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
use crate::core::tenant::Tenant;
use crate::interfaces::ResourceStore;
use crate::interfaces::StoreError;
use crate::interfaces::TenantStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Catalog rows protected by one mutex.
#[derive(Debug, Default)]
struct CatalogState {
    /// Tenant rows keyed by tenant id.
    tenants: BTreeMap<String, Tenant>,
    /// Product rows keyed by product id.
    products: BTreeMap<String, Product>,
    /// Component rows keyed by component id.
    components: BTreeMap<String, Component>,
    /// Certificate rows keyed by certificate id.
    certificates: BTreeMap<String, Certificate>,
    /// Supplier rows keyed by supplier id.
    suppliers: BTreeMap<String, Supplier>,
}

/// In-memory catalog store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    /// Catalog state map protected by a mutex.
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty in-memory catalog store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a product row for fixtures and demos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        guard.products.insert(product.product_id.to_string(), product);
        Ok(())
    }

    /// Inserts a component row for fixtures and demos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn insert_component(&self, component: Component) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        guard.components.insert(component.component_id.to_string(), component);
        Ok(())
    }

    /// Inserts a certificate row for fixtures and demos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn insert_certificate(&self, certificate: Certificate) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        guard.certificates.insert(certificate.certificate_id.to_string(), certificate);
        Ok(())
    }

    /// Inserts a supplier row for fixtures and demos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn insert_supplier(&self, supplier: Supplier) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        guard.suppliers.insert(supplier.supplier_id.to_string(), supplier);
        Ok(())
    }

    /// Locks the catalog state, mapping poisoning to a store error.
    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, CatalogState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("catalog store mutex poisoned".to_string()))
    }
}

impl TenantStore for InMemoryCatalogStore {
    fn tenants_for_owner(&self, owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard.tenants.values().filter(|tenant| tenant.owner_id == *owner_id).cloned().collect())
    }

    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError> {
        let mut guard = self.lock_state()?;
        if guard.tenants.values().any(|existing| existing.owner_id == tenant.owner_id) {
            return Err(StoreError::UniqueViolation(format!(
                "owner {} already has a tenant",
                tenant.owner_id
            )));
        }
        if guard.tenants.contains_key(tenant.tenant_id.as_str()) {
            return Err(StoreError::UniqueViolation(format!(
                "tenant {} already exists",
                tenant.tenant_id
            )));
        }
        guard.tenants.insert(tenant.tenant_id.to_string(), tenant.clone());
        Ok(tenant.clone())
    }

    fn count_products(&self, tenant_id: &TenantId) -> Result<u32, StoreError> {
        let guard = self.lock_state()?;
        let count =
            guard.products.values().filter(|product| product.brand_id == *tenant_id).count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl ResourceStore for InMemoryCatalogStore {
    fn product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard.products.get(product_id.as_str()).cloned())
    }

    fn component(&self, component_id: &ComponentId) -> Result<Option<Component>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard.components.get(component_id.as_str()).cloned())
    }

    fn certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard.certificates.get(certificate_id.as_str()).cloned())
    }

    fn supplier(&self, supplier_id: &SupplierId) -> Result<Option<Supplier>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard.suppliers.get(supplier_id.as_str()).cloned())
    }
}

// ============================================================================
// SECTION: Shared Store Wrappers
// ============================================================================

/// Shared tenant store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedTenantStore {
    /// Inner store implementation.
    inner: Arc<dyn TenantStore + Send + Sync>,
}

impl SharedTenantStore {
    /// Wraps a tenant store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl TenantStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn TenantStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl TenantStore for SharedTenantStore {
    fn tenants_for_owner(&self, owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        self.inner.tenants_for_owner(owner_id)
    }

    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError> {
        self.inner.insert_tenant(tenant)
    }

    fn count_products(&self, tenant_id: &TenantId) -> Result<u32, StoreError> {
        self.inner.count_products(tenant_id)
    }
}

/// Shared resource store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedResourceStore {
    /// Inner store implementation.
    inner: Arc<dyn ResourceStore + Send + Sync>,
}

impl SharedResourceStore {
    /// Wraps a resource store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ResourceStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ResourceStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ResourceStore for SharedResourceStore {
    fn product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.inner.product(product_id)
    }

    fn component(&self, component_id: &ComponentId) -> Result<Option<Component>, StoreError> {
        self.inner.component(component_id)
    }

    fn certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        self.inner.certificate(certificate_id)
    }

    fn supplier(&self, supplier_id: &SupplierId) -> Result<Option<Supplier>, StoreError> {
        self.inner.supplier(supplier_id)
    }
}
