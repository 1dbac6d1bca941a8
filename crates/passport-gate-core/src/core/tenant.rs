// crates/passport-gate-core/src/core/tenant.rs
// ============================================================================
// Module: Passport Gate Tenant Model
// Description: Identity and tenant snapshots consumed by policy evaluation.
// Purpose: Provide immutable value types for the billable unit and its owner.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identity and tenant values are snapshots read from external collaborators
//! (the auth session provider and the relational store). The policy engine
//! treats them as immutable for the duration of one authorization decision
//! and never mutates or caches them across requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::IdentityId;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Caller identity supplied by the external auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity identifier.
    pub id: IdentityId,
    /// Email address on the session.
    pub email: String,
    /// Whether the session is authenticated.
    pub authenticated: bool,
}

impl Identity {
    /// Creates an authenticated identity.
    #[must_use]
    pub fn authenticated(id: impl Into<IdentityId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            authenticated: true,
        }
    }

    /// Creates an anonymous, unauthenticated identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: IdentityId::new(""),
            email: String::new(),
            authenticated: false,
        }
    }
}

// ============================================================================
// SECTION: Subscription State
// ============================================================================

/// Subscription status written by the payment-webhook collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No paid subscription.
    Free,
    /// Paid subscription in good standing.
    Active,
    /// Subscription canceled by the customer.
    Canceled,
    /// Payment failed; subscription past due.
    PastDue,
    /// Trial period in progress.
    Trialing,
}

impl SubscriptionStatus {
    /// Returns true when the subscription unlocks paid entitlements.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Plan name persisted alongside the subscription status.
///
/// Plan names are tracked for billing display; entitlement differentiation
/// beyond the active/not-active split is layered on via configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanName {
    /// Free tier.
    Free,
    /// Starter tier.
    Starter,
    /// Pro tier.
    Pro,
    /// Enterprise tier.
    Enterprise,
}

// ============================================================================
// SECTION: Tenant
// ============================================================================

/// Tenant ("brand") snapshot: the billable unit owning catalog resources.
///
/// # Invariants
/// - At most one tenant exists per `owner_id`; the storage layer's uniqueness
///   constraint is the final arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// Identity that owns the tenant.
    pub owner_id: IdentityId,
    /// Display name of the brand.
    pub name: String,
    /// Subscription status at snapshot time.
    pub subscription_status: SubscriptionStatus,
    /// Plan name at snapshot time.
    pub plan_name: PlanName,
}
