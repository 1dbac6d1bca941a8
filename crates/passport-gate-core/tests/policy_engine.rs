// crates/passport-gate-core/tests/policy_engine.rs
// ============================================================================
// Module: Policy Engine Tests
// Description: End-to-end authorize pipeline tests against the in-memory store.
// ============================================================================
//! ## Overview
//! Validates the fail-fast authorize pipeline: authentication, tenant
//! resolution, ownership, quota, feature gating, and audit emission.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use passport_gate_core::AuthorizeRequest;
use passport_gate_core::Certificate;
use passport_gate_core::CertificateId;
use passport_gate_core::Component;
use passport_gate_core::ComponentId;
use passport_gate_core::CorrelationId;
use passport_gate_core::Decision;
use passport_gate_core::DenyReason;
use passport_gate_core::Feature;
use passport_gate_core::Identity;
use passport_gate_core::IdentityId;
use passport_gate_core::InMemoryCatalogStore;
use passport_gate_core::MemoryAuditSink;
use passport_gate_core::PlanName;
use passport_gate_core::PolicyAction;
use passport_gate_core::PolicyEngine;
use passport_gate_core::PolicyEngineConfig;
use passport_gate_core::PolicyError;
use passport_gate_core::Product;
use passport_gate_core::ProductId;
use passport_gate_core::ResourceRef;
use passport_gate_core::SharedAuditSink;
use passport_gate_core::StoreError;
use passport_gate_core::SubscriptionStatus;
use passport_gate_core::Tenant;
use passport_gate_core::TenantId;
use passport_gate_core::TenantStore;
use passport_gate_core::Timestamp;
use passport_gate_core::interfaces::ResourceStore;
use passport_gate_core::interpret_insert_error;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn tenant(status: SubscriptionStatus) -> Tenant {
    Tenant {
        tenant_id: TenantId::new("brand-1"),
        owner_id: IdentityId::new("user-1"),
        name: "Acme Threads".to_string(),
        subscription_status: status,
        plan_name: PlanName::Free,
    }
}

fn owner_identity() -> Identity {
    Identity::authenticated("user-1", "owner@acme.example")
}

fn request(action: PolicyAction) -> AuthorizeRequest {
    AuthorizeRequest::new(action, Timestamp::Logical(1))
}

fn engine_with_store(
    status: SubscriptionStatus,
) -> (PolicyEngine<InMemoryCatalogStore, InMemoryCatalogStore>, InMemoryCatalogStore) {
    let store = InMemoryCatalogStore::new();
    store.insert_tenant(&tenant(status)).unwrap();
    let engine = PolicyEngine::new(store.clone(), store.clone(), PolicyEngineConfig::default());
    (engine, store)
}

fn seed_products(store: &InMemoryCatalogStore, count: u32) {
    for index in 0..count {
        store
            .insert_product(Product {
                product_id: ProductId::new(format!("product-{index}")),
                brand_id: TenantId::new("brand-1"),
                name: format!("Product {index}"),
            })
            .unwrap();
    }
}

fn seed_certificate_chain(store: &InMemoryCatalogStore, brand: &str) {
    store
        .insert_product(Product {
            product_id: ProductId::new("product-x"),
            brand_id: TenantId::new(brand),
            name: "Jacket".to_string(),
        })
        .unwrap();
    store
        .insert_component(Component {
            component_id: ComponentId::new("component-x"),
            product_id: ProductId::new("product-x"),
            name: "Outer shell".to_string(),
        })
        .unwrap();
    store
        .insert_certificate(Certificate {
            certificate_id: CertificateId::new("certificate-x"),
            component_id: ComponentId::new("component-x"),
            name: "Recycled content".to_string(),
        })
        .unwrap();
}

/// Tenant store that fails every call; proves a path never touches storage.
struct UnreachableStore;

impl TenantStore for UnreachableStore {
    fn tenants_for_owner(&self, _owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        Err(StoreError::Io("store must not be reached".to_string()))
    }

    fn insert_tenant(&self, _tenant: &Tenant) -> Result<Tenant, StoreError> {
        Err(StoreError::Io("store must not be reached".to_string()))
    }

    fn count_products(&self, _tenant_id: &TenantId) -> Result<u32, StoreError> {
        Err(StoreError::Io("store must not be reached".to_string()))
    }
}

/// Tenant store returning two tenants for one owner.
struct DuplicateOwnerStore;

impl TenantStore for DuplicateOwnerStore {
    fn tenants_for_owner(&self, _owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        let mut first = tenant(SubscriptionStatus::Free);
        let mut second = tenant(SubscriptionStatus::Free);
        first.tenant_id = TenantId::new("brand-1");
        second.tenant_id = TenantId::new("brand-2");
        Ok(vec![first, second])
    }

    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError> {
        Ok(tenant.clone())
    }

    fn count_products(&self, _tenant_id: &TenantId) -> Result<u32, StoreError> {
        Ok(0)
    }
}

// ============================================================================
// SECTION: Quota Scenarios
// ============================================================================

#[test]
fn test_free_tenant_at_cap_denied_with_exact_numbers() {
    let (engine, store) = engine_with_store(SubscriptionStatus::Free);
    seed_products(&store, 10);

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::CreateProducts {
                count: 1,
            }),
        )
        .unwrap();

    assert_eq!(
        decision,
        Decision::deny(DenyReason::QuotaExceeded {
            current: 10,
            requested: 1,
            max: 10,
        })
    );
}

#[test]
fn test_active_tenant_allows_large_batch() {
    let (engine, store) = engine_with_store(SubscriptionStatus::Active);
    seed_products(&store, 10);

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::CreateProducts {
                count: 1000,
            }),
        )
        .unwrap();

    assert!(decision.is_allow());
}

#[test]
fn test_free_tenant_batch_rejected_as_a_whole() {
    let (engine, store) = engine_with_store(SubscriptionStatus::Free);
    seed_products(&store, 4);

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::CreateProducts {
                count: 15,
            }),
        )
        .unwrap();

    assert_eq!(
        decision,
        Decision::deny(DenyReason::QuotaExceeded {
            current: 4,
            requested: 15,
            max: 10,
        })
    );
}

// ============================================================================
// SECTION: Ownership Scenarios
// ============================================================================

#[test]
fn test_foreign_certificate_chain_denied() {
    let (engine, store) = engine_with_store(SubscriptionStatus::Active);
    seed_certificate_chain(&store, "brand-other");

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::MutateResource {
                resource: ResourceRef::Certificate(CertificateId::new("certificate-x")),
            }),
        )
        .unwrap();

    assert_eq!(decision, Decision::deny(DenyReason::NotFoundOrForbidden));
}

#[test]
fn test_owned_resource_returned_with_allow() {
    let (engine, store) = engine_with_store(SubscriptionStatus::Active);
    seed_certificate_chain(&store, "brand-1");

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::ReadResource {
                resource: ResourceRef::Product(ProductId::new("product-x")),
            }),
        )
        .unwrap();

    match decision {
        Decision::Allow {
            resource: Some(resource),
            ..
        } => {
            assert_eq!(resource, store.product(&ProductId::new("product-x")).unwrap().map(
                passport_gate_core::Resource::Product
            ).unwrap());
        }
        other => panic!("expected allow with resolved resource, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Authentication and Tenancy
// ============================================================================

#[test]
fn test_unauthenticated_denied_without_store_access() {
    let engine = PolicyEngine::new(
        UnreachableStore,
        InMemoryCatalogStore::new(),
        PolicyEngineConfig::default(),
    );

    let decision = engine
        .authorize(
            &Identity::anonymous(),
            &request(PolicyAction::CreateProducts {
                count: 1,
            }),
        )
        .unwrap();

    assert_eq!(decision, Decision::deny(DenyReason::Unauthenticated));
}

#[test]
fn test_missing_tenant_denied_for_catalog_actions() {
    let store = InMemoryCatalogStore::new();
    let engine = PolicyEngine::new(store.clone(), store, PolicyEngineConfig::default());

    let decision = engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::CreateProducts {
                count: 1,
            }),
        )
        .unwrap();

    assert_eq!(decision, Decision::deny(DenyReason::TenantNotFound));
}

#[test]
fn test_create_tenant_allowed_when_none_exists() {
    let store = InMemoryCatalogStore::new();
    let engine = PolicyEngine::new(store.clone(), store, PolicyEngineConfig::default());

    let decision =
        engine.authorize(&owner_identity(), &request(PolicyAction::CreateTenant)).unwrap();

    assert!(decision.is_allow());
}

#[test]
fn test_create_tenant_denied_when_one_exists() {
    let (engine, _store) = engine_with_store(SubscriptionStatus::Free);

    let decision =
        engine.authorize(&owner_identity(), &request(PolicyAction::CreateTenant)).unwrap();

    assert_eq!(decision, Decision::deny(DenyReason::AlreadyHasTenant));
}

#[test]
fn test_duplicate_owner_rows_fail_closed() {
    let engine = PolicyEngine::new(
        DuplicateOwnerStore,
        InMemoryCatalogStore::new(),
        PolicyEngineConfig::default(),
    );

    let result = engine.authorize(&owner_identity(), &request(PolicyAction::CreateTenant));

    assert!(matches!(result, Err(PolicyError::Integrity(_))));
}

#[test]
fn test_insert_unique_violation_reads_as_denial() {
    let error = StoreError::UniqueViolation("owner user-1 already has a tenant".to_string());
    assert_eq!(
        interpret_insert_error(&error),
        Some(Decision::deny(DenyReason::AlreadyHasTenant))
    );

    let io_error = StoreError::Io("disk unplugged".to_string());
    assert_eq!(interpret_insert_error(&io_error), None);
}

// ============================================================================
// SECTION: Feature Gating
// ============================================================================

#[test]
fn test_certificate_upload_gated_on_subscription() {
    let (free_engine, free_store) = engine_with_store(SubscriptionStatus::Free);
    seed_certificate_chain(&free_store, "brand-1");

    let denied = free_engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::UploadCertificate {
                component_id: ComponentId::new("component-x"),
            }),
        )
        .unwrap();
    assert_eq!(
        denied,
        Decision::deny(DenyReason::FeatureNotEntitled {
            feature: Feature::Certificates,
        })
    );

    let (active_engine, active_store) = engine_with_store(SubscriptionStatus::Active);
    seed_certificate_chain(&active_store, "brand-1");

    let allowed = active_engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::UploadCertificate {
                component_id: ComponentId::new("component-x"),
            }),
        )
        .unwrap();
    assert!(allowed.is_allow());
}

#[test]
fn test_branding_actions_gated_on_subscription() {
    let (engine, _store) = engine_with_store(SubscriptionStatus::PastDue);

    let branding =
        engine.authorize(&owner_identity(), &request(PolicyAction::RemoveBranding)).unwrap();
    assert_eq!(
        branding,
        Decision::deny(DenyReason::FeatureNotEntitled {
            feature: Feature::BrandingRemoval,
        })
    );

    let color =
        engine.authorize(&owner_identity(), &request(PolicyAction::SetBrandColor)).unwrap();
    assert_eq!(
        color,
        Decision::deny(DenyReason::FeatureNotEntitled {
            feature: Feature::BrandColor,
        })
    );
}

// ============================================================================
// SECTION: Audit Emission
// ============================================================================

#[test]
fn test_each_authorize_call_emits_one_audit_event() {
    let sink = MemoryAuditSink::new();
    let store = InMemoryCatalogStore::new();
    store.insert_tenant(&tenant(SubscriptionStatus::Free)).unwrap();
    let engine = PolicyEngine::new(store.clone(), store.clone(), PolicyEngineConfig::default())
        .with_audit_sink(SharedAuditSink::from_sink(sink.clone()));
    seed_products(&store, 10);

    let allow_request = AuthorizeRequest::new(
        PolicyAction::ReadResource {
            resource: ResourceRef::Product(ProductId::new("product-0")),
        },
        Timestamp::UnixMillis(1_700_000_000_000),
    )
    .with_correlation(CorrelationId::new("req-42"));
    engine.authorize(&owner_identity(), &allow_request).unwrap();
    engine
        .authorize(
            &owner_identity(),
            &request(PolicyAction::CreateProducts {
                count: 3,
            }),
        )
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].event, "policy_decision");
    assert_eq!(events[0].action, "read_resource");
    assert!(events[0].allowed);
    assert_eq!(events[0].reason, None);
    assert_eq!(events[0].tenant_id.as_deref(), Some("brand-1"));
    assert_eq!(events[0].correlation_id.as_deref(), Some("req-42"));

    assert_eq!(events[1].action, "create_products");
    assert!(!events[1].allowed);
    assert_eq!(events[1].reason, Some("quota_exceeded"));
    assert_eq!(events[1].quota_current, Some(10));
    assert_eq!(events[1].quota_requested, Some(3));
    assert_eq!(events[1].quota_max, Some(10));
}
