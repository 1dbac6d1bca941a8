// crates/passport-gate-core/src/core/mod.rs
// ============================================================================
// Module: Passport Gate Core Types
// Description: Canonical domain snapshots and decision structures.
// Purpose: Provide stable, serializable types for policy evaluation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the tenant, resource, entitlement, and decision model
//! consumed by the policy engine runtime. These types are the canonical
//! source of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decision;
pub mod entitlements;
pub mod identifiers;
pub mod resource;
pub mod tenant;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::Decision;
pub use decision::DenyReason;
pub use decision::PolicyAction;
pub use entitlements::DEFAULT_FREE_TIER_MAX_PRODUCTS;
pub use entitlements::Entitlement;
pub use entitlements::EntitlementRules;
pub use entitlements::Feature;
pub use entitlements::ProductLimit;
pub use identifiers::CertificateId;
pub use identifiers::ComponentId;
pub use identifiers::CorrelationId;
pub use identifiers::IdentityId;
pub use identifiers::ProductId;
pub use identifiers::SupplierId;
pub use identifiers::TenantId;
pub use resource::Certificate;
pub use resource::Component;
pub use resource::Product;
pub use resource::Resource;
pub use resource::ResourceKind;
pub use resource::ResourceRef;
pub use resource::Supplier;
pub use tenant::Identity;
pub use tenant::PlanName;
pub use tenant::SubscriptionStatus;
pub use tenant::Tenant;
pub use time::Timestamp;
