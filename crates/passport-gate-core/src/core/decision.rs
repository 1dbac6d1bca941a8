// crates/passport-gate-core/src/core/decision.rs
// ============================================================================
// Module: Passport Gate Decisions
// Description: Policy actions, denial reasons, and decision values.
// Purpose: Provide structured allow/deny outcomes for authorize calls.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A decision is an ephemeral value returned by the policy engine, never
//! persisted. Every denial carries enough structured detail for the calling
//! layer to produce a specific, actionable message rather than a generic
//! rejection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::entitlements::Feature;
use crate::core::identifiers::ComponentId;
use crate::core::identifiers::ProductId;
use crate::core::resource::Resource;
use crate::core::resource::ResourceRef;

// ============================================================================
// SECTION: Policy Actions
// ============================================================================

/// Gated operation submitted to the policy engine for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PolicyAction {
    /// Create the caller's tenant ("create brand").
    CreateTenant,
    /// Create `count` products in one batch; the whole batch is accepted or
    /// rejected at the policy layer.
    CreateProducts {
        /// Number of products in the batch.
        count: u32,
    },
    /// Read a catalog resource.
    ReadResource {
        /// Resource to read.
        resource: ResourceRef,
    },
    /// Mutate a catalog resource.
    MutateResource {
        /// Resource to mutate.
        resource: ResourceRef,
    },
    /// Delete a catalog resource.
    DeleteResource {
        /// Resource to delete.
        resource: ResourceRef,
    },
    /// Upload a certificate to a component.
    UploadCertificate {
        /// Component receiving the certificate.
        component_id: ComponentId,
    },
    /// Edit compliance fields on a product.
    EditCompliance {
        /// Product whose compliance fields change.
        product_id: ProductId,
    },
    /// Remove platform branding from the tenant's public pages.
    RemoveBranding,
    /// Set a non-default brand color on the tenant's public pages.
    SetBrandColor,
}

impl PolicyAction {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateTenant => "create_tenant",
            Self::CreateProducts { .. } => "create_products",
            Self::ReadResource { .. } => "read_resource",
            Self::MutateResource { .. } => "mutate_resource",
            Self::DeleteResource { .. } => "delete_resource",
            Self::UploadCertificate { .. } => "upload_certificate",
            Self::EditCompliance { .. } => "edit_compliance",
            Self::RemoveBranding => "remove_branding",
            Self::SetBrandColor => "set_brand_color",
        }
    }

    /// Returns the resource whose ownership chain must be walked, if any.
    #[must_use]
    pub fn resource_ref(&self) -> Option<ResourceRef> {
        match self {
            Self::ReadResource { resource }
            | Self::MutateResource { resource }
            | Self::DeleteResource { resource } => Some(resource.clone()),
            Self::UploadCertificate { component_id } => {
                Some(ResourceRef::Component(component_id.clone()))
            }
            Self::EditCompliance { product_id } => Some(ResourceRef::Product(product_id.clone())),
            Self::CreateTenant | Self::CreateProducts { .. } | Self::RemoveBranding
            | Self::SetBrandColor => None,
        }
    }

    /// Returns the number of resources the action creates, if quota-gated.
    #[must_use]
    pub const fn requested_count(&self) -> Option<u32> {
        match self {
            Self::CreateProducts { count } => Some(*count),
            _ => None,
        }
    }

    /// Returns the feature the action requires, if feature-gated.
    #[must_use]
    pub const fn required_feature(&self) -> Option<Feature> {
        match self {
            Self::UploadCertificate { .. } => Some(Feature::Certificates),
            Self::EditCompliance { .. } => Some(Feature::ComplianceEditing),
            Self::RemoveBranding => Some(Feature::BrandingRemoval),
            Self::SetBrandColor => Some(Feature::BrandColor),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Denial Reasons
// ============================================================================

/// Structured reason attached to every deny decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// Caller is not authenticated.
    Unauthenticated,
    /// Caller has no tenant yet; expected for onboarding flows.
    TenantNotFound,
    /// Caller already owns a tenant.
    AlreadyHasTenant,
    /// Resource is missing or belongs to another tenant; deliberately merged
    /// so denial never leaks whether the resource exists.
    NotFoundOrForbidden,
    /// Product creation would exceed the tenant's quota.
    QuotaExceeded {
        /// Products currently owned by the tenant.
        current: u32,
        /// Products requested in this batch.
        requested: u32,
        /// Product cap for the tenant's entitlement set.
        max: u32,
    },
    /// The action requires a feature the tenant is not entitled to.
    FeatureNotEntitled {
        /// Missing feature.
        feature: Feature,
    },
}

impl DenyReason {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::TenantNotFound => "tenant_not_found",
            Self::AlreadyHasTenant => "already_has_tenant",
            Self::NotFoundOrForbidden => "not_found_or_forbidden",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::FeatureNotEntitled { .. } => "feature_not_entitled",
        }
    }
}

// ============================================================================
// SECTION: Decision Values
// ============================================================================

/// Outcome of one authorize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// The action may proceed.
    Allow {
        /// Remaining creation capacity after the action, when quota-gated.
        remaining: Option<u32>,
        /// Resolved resource from the ownership walk, when resource-gated.
        resource: Option<Resource>,
    },
    /// The action is rejected.
    Deny {
        /// Structured denial reason.
        reason: DenyReason,
    },
}

impl Decision {
    /// Creates a plain allow decision.
    #[must_use]
    pub const fn allow() -> Self {
        Self::Allow {
            remaining: None,
            resource: None,
        }
    }

    /// Creates an allow decision carrying remaining creation capacity.
    #[must_use]
    pub const fn allow_with_remaining(remaining: u32) -> Self {
        Self::Allow {
            remaining: Some(remaining),
            resource: None,
        }
    }

    /// Creates a deny decision with the given reason.
    #[must_use]
    pub const fn deny(reason: DenyReason) -> Self {
        Self::Deny {
            reason,
        }
    }

    /// Returns true when the decision allows the action.
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Returns the denial reason when the decision is a deny.
    #[must_use]
    pub const fn reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny { reason } => Some(reason),
        }
    }
}
