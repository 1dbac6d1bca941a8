// crates/passport-gate-core/src/core/resource.rs
// ============================================================================
// Module: Passport Gate Resource Model
// Description: Catalog resource snapshots and their ownership chain links.
// Purpose: Provide typed rows whose foreign keys terminate at one tenant.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Catalog resources are read from the external store as immutable snapshots.
//! Each resource carries a foreign-key chain that must terminate at exactly
//! one tenant: products and suppliers link directly via `brand_id`,
//! components link through their product, and certificates link through their
//! component and then its product.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CertificateId;
use crate::core::identifiers::ComponentId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::SupplierId;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Resource Rows
// ============================================================================

/// Product row with a direct link to its owning tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub product_id: ProductId,
    /// Owning tenant identifier.
    pub brand_id: TenantId,
    /// Display name of the product.
    pub name: String,
}

/// Component row linked to a tenant through its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Component identifier.
    pub component_id: ComponentId,
    /// Parent product identifier.
    pub product_id: ProductId,
    /// Display name of the component.
    pub name: String,
}

/// Certificate row linked to a tenant through its component and product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate identifier.
    pub certificate_id: CertificateId,
    /// Parent component identifier.
    pub component_id: ComponentId,
    /// Display name of the certificate.
    pub name: String,
}

/// Supplier row with a direct link to its owning tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Supplier identifier.
    pub supplier_id: SupplierId,
    /// Owning tenant identifier.
    pub brand_id: TenantId,
    /// Display name of the supplier.
    pub name: String,
}

// ============================================================================
// SECTION: Resource References
// ============================================================================

/// Resource kinds subject to ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Product resource.
    Product,
    /// Component resource.
    Component,
    /// Certificate resource.
    Certificate,
    /// Supplier resource.
    Supplier,
}

impl ResourceKind {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Component => "component",
            Self::Certificate => "certificate",
            Self::Supplier => "supplier",
        }
    }
}

/// Typed reference to a catalog resource by kind and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    /// Reference to a product.
    Product(ProductId),
    /// Reference to a component.
    Component(ComponentId),
    /// Reference to a certificate.
    Certificate(CertificateId),
    /// Reference to a supplier.
    Supplier(SupplierId),
}

impl ResourceRef {
    /// Returns the referenced resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Product(_) => ResourceKind::Product,
            Self::Component(_) => ResourceKind::Component,
            Self::Certificate(_) => ResourceKind::Certificate,
            Self::Supplier(_) => ResourceKind::Supplier,
        }
    }

    /// Returns the referenced identifier as a string slice.
    #[must_use]
    pub fn id_str(&self) -> &str {
        match self {
            Self::Product(id) => id.as_str(),
            Self::Component(id) => id.as_str(),
            Self::Certificate(id) => id.as_str(),
            Self::Supplier(id) => id.as_str(),
        }
    }
}

/// Resolved resource row returned by a successful ownership walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum Resource {
    /// Resolved product row.
    Product(Product),
    /// Resolved component row.
    Component(Component),
    /// Resolved certificate row.
    Certificate(Certificate),
    /// Resolved supplier row.
    Supplier(Supplier),
}

impl Resource {
    /// Returns the resolved resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Product(_) => ResourceKind::Product,
            Self::Component(_) => ResourceKind::Component,
            Self::Certificate(_) => ResourceKind::Certificate,
            Self::Supplier(_) => ResourceKind::Supplier,
        }
    }
}
