// crates/passport-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Policy Engine Facade
// Description: Single authorize entrypoint composing the policy steps.
// Purpose: Provide fail-fast, fail-closed authorization for every mutation.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The policy engine composes tenant resolution, ownership walking, quota
//! enforcement, and feature gating into one call consulted before any
//! mutation. Each call is stateless: the pipeline runs
//! identity, tenant, ownership, quota, feature in order, and any step's
//! denial short-circuits with that step's reason; later steps never run, so
//! the least possible information is revealed.
//!
//! Expected business outcomes are returned as [`Decision`] values. Only
//! integrity violations and store I/O failures surface as [`PolicyError`];
//! callers should log those and show a generic failure message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::decision::Decision;
use crate::core::decision::DenyReason;
use crate::core::decision::PolicyAction;
use crate::core::entitlements::EntitlementRules;
use crate::core::identifiers::CorrelationId;
use crate::core::identifiers::TenantId;
use crate::core::tenant::Identity;
use crate::core::time::Timestamp;
use crate::interfaces::ResourceStore;
use crate::interfaces::StoreError;
use crate::interfaces::TenantStore;
use crate::runtime::audit::AuditSink;
use crate::runtime::audit::DecisionAuditEvent;
use crate::runtime::audit::DecisionAuditEventParams;
use crate::runtime::audit::SharedAuditSink;
use crate::runtime::ownership::OwnershipCheck;
use crate::runtime::ownership::OwnershipGuard;
use crate::runtime::quota::QuotaEnforcer;
use crate::runtime::resolver::TenantResolution;
use crate::runtime::resolver::TenantResolver;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy engine errors.
///
/// Expected business outcomes never appear here; they are returned as
/// [`Decision`] values instead.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A stored-data invariant was violated; evaluation fails closed.
    #[error("policy integrity violation: {0}")]
    Integrity(String),
    /// An external collaborator failed during evaluation.
    #[error("policy infrastructure error: {0}")]
    Infrastructure(#[from] StoreError),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Policy engine configuration.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngineConfig {
    /// Entitlement rule table evaluated per tenant.
    pub rules: EntitlementRules,
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// One authorization request evaluated by [`PolicyEngine::authorize`].
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    /// Action to authorize.
    pub action: PolicyAction,
    /// Caller-supplied decision timestamp.
    pub at: Timestamp,
    /// Optional correlation identifier carried into the audit record.
    pub correlation_id: Option<CorrelationId>,
}

impl AuthorizeRequest {
    /// Creates a request without a correlation identifier.
    #[must_use]
    pub const fn new(action: PolicyAction, at: Timestamp) -> Self {
        Self {
            action,
            at,
            correlation_id: None,
        }
    }

    /// Attaches a correlation identifier to the request.
    #[must_use]
    pub fn with_correlation(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Outcome of one evaluation, paired with the tenant it resolved.
struct Evaluation {
    /// Decision produced by the pipeline.
    decision: Decision,
    /// Tenant resolved during evaluation, when one exists.
    tenant_id: Option<TenantId>,
}

/// Centralized tenant policy engine consulted before every mutation.
pub struct PolicyEngine<T: TenantStore, R: ResourceStore> {
    /// Tenant store for resolution and product counting.
    tenants: T,
    /// Resource store for ownership chain walking.
    resources: R,
    /// Engine configuration.
    config: PolicyEngineConfig,
    /// Sink receiving one audit event per authorize call.
    audit: SharedAuditSink,
}

impl<T: TenantStore, R: ResourceStore> PolicyEngine<T, R> {
    /// Creates a policy engine without audit output.
    #[must_use]
    pub fn new(tenants: T, resources: R, config: PolicyEngineConfig) -> Self {
        Self {
            tenants,
            resources,
            config,
            audit: SharedAuditSink::noop(),
        }
    }

    /// Routes audit events to the given sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: SharedAuditSink) -> Self {
        self.audit = sink;
        self
    }

    /// Authorizes one action for the calling identity.
    ///
    /// Runs the fail-fast pipeline and emits exactly one audit event per
    /// call, covering both decisions and evaluation errors.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Integrity`] when stored data violates an
    /// invariant and [`PolicyError::Infrastructure`] when a store read fails.
    pub fn authorize(
        &self,
        identity: &Identity,
        request: &AuthorizeRequest,
    ) -> Result<Decision, PolicyError> {
        let outcome = self.evaluate(identity, &request.action);
        match &outcome {
            Ok(evaluation) => self.record_decision(identity, request, evaluation),
            Err(error) => self.record_error(identity, request, error),
        }
        outcome.map(|evaluation| evaluation.decision)
    }

    /// Runs the authorization pipeline for one action.
    fn evaluate(&self, identity: &Identity, action: &PolicyAction)
    -> Result<Evaluation, PolicyError> {
        let resolver = TenantResolver::new(&self.tenants);
        let tenant = match resolver.resolve(identity)? {
            TenantResolution::Unauthenticated => {
                return Ok(Evaluation {
                    decision: Decision::deny(DenyReason::Unauthenticated),
                    tenant_id: None,
                });
            }
            TenantResolution::NotFound => {
                let decision = if matches!(action, PolicyAction::CreateTenant) {
                    Decision::allow()
                } else {
                    Decision::deny(DenyReason::TenantNotFound)
                };
                return Ok(Evaluation {
                    decision,
                    tenant_id: None,
                });
            }
            TenantResolution::Resolved(tenant) => tenant,
        };
        let tenant_id = tenant.tenant_id.clone();
        if matches!(action, PolicyAction::CreateTenant) {
            return Ok(Evaluation {
                decision: Decision::deny(DenyReason::AlreadyHasTenant),
                tenant_id: Some(tenant_id),
            });
        }

        let mut resolved_resource = None;
        if let Some(resource_ref) = action.resource_ref() {
            let guard = OwnershipGuard::new(&self.resources);
            match guard.assert_owned(&tenant, &resource_ref)? {
                OwnershipCheck::Owned(resource) => resolved_resource = Some(resource),
                OwnershipCheck::NotFoundOrForbidden => {
                    return Ok(Evaluation {
                        decision: Decision::deny(DenyReason::NotFoundOrForbidden),
                        tenant_id: Some(tenant_id),
                    });
                }
            }
        }

        let entitlement = self.config.rules.resolve(&tenant);

        let mut remaining = None;
        if let Some(requested) = action.requested_count() {
            let enforcer = QuotaEnforcer::new(&self.tenants);
            match enforcer.check_create(&tenant, &entitlement, requested)? {
                Decision::Allow {
                    remaining: left, ..
                } => remaining = left,
                denied @ Decision::Deny { .. } => {
                    return Ok(Evaluation {
                        decision: denied,
                        tenant_id: Some(tenant_id),
                    });
                }
            }
        }

        if let Some(feature) = action.required_feature()
            && !entitlement.allows(feature)
        {
            return Ok(Evaluation {
                decision: Decision::deny(DenyReason::FeatureNotEntitled {
                    feature,
                }),
                tenant_id: Some(tenant_id),
            });
        }

        Ok(Evaluation {
            decision: Decision::Allow {
                remaining,
                resource: resolved_resource,
            },
            tenant_id: Some(tenant_id),
        })
    }

    /// Emits the audit event for a completed evaluation.
    fn record_decision(
        &self,
        identity: &Identity,
        request: &AuthorizeRequest,
        evaluation: &Evaluation,
    ) {
        let (quota_current, quota_requested, quota_max) = match evaluation.decision.reason() {
            Some(DenyReason::QuotaExceeded {
                current,
                requested,
                max,
            }) => (Some(*current), Some(*requested), Some(*max)),
            _ => (None, None, None),
        };
        let event = DecisionAuditEvent::new(DecisionAuditEventParams {
            at: request.at,
            identity_id: identity.id.to_string(),
            authenticated: identity.authenticated,
            tenant_id: evaluation.tenant_id.as_ref().map(ToString::to_string),
            action: request.action.label(),
            allowed: evaluation.decision.is_allow(),
            reason: evaluation.decision.reason().map(DenyReason::label),
            quota_current,
            quota_requested,
            quota_max,
            correlation_id: request.correlation_id.as_ref().map(ToString::to_string),
        });
        self.audit.record(&event);
    }

    /// Emits the audit event for an evaluation that failed with an error.
    fn record_error(&self, identity: &Identity, request: &AuthorizeRequest, error: &PolicyError) {
        let event = DecisionAuditEvent::new(DecisionAuditEventParams {
            at: request.at,
            identity_id: identity.id.to_string(),
            authenticated: identity.authenticated,
            tenant_id: None,
            action: request.action.label(),
            allowed: false,
            reason: Some(error_label(error)),
            quota_current: None,
            quota_requested: None,
            quota_max: None,
            correlation_id: request.correlation_id.as_ref().map(ToString::to_string),
        });
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Interprets a tenant-insert failure as a policy outcome where applicable.
///
/// The storage layer's uniqueness constraint is the final arbiter for the
/// tenant-per-owner invariant: a unique violation on insert is a normal
/// denial, not a crash. Other store failures return `None` and should be
/// propagated as infrastructure errors.
#[must_use]
pub fn interpret_insert_error(error: &StoreError) -> Option<Decision> {
    match error {
        StoreError::UniqueViolation(_) => Some(Decision::deny(DenyReason::AlreadyHasTenant)),
        _ => None,
    }
}

/// Returns the audit reason label for an evaluation error.
const fn error_label(error: &PolicyError) -> &'static str {
    match error {
        PolicyError::Integrity(_) => "integrity_error",
        PolicyError::Infrastructure(_) => "infrastructure_error",
    }
}
