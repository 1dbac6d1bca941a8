// crates/passport-gate-core/tests/proptest_policy.rs
// ============================================================================
// Module: Policy Property-Based Tests
// Description: Property tests for quota arithmetic and entitlement resolution.
// Purpose: Detect invariant violations across wide input ranges.
// ============================================================================

//! Property-based tests for policy invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use passport_gate_core::Certificate;
use passport_gate_core::CertificateId;
use passport_gate_core::Component;
use passport_gate_core::ComponentId;
use passport_gate_core::Decision;
use passport_gate_core::DenyReason;
use passport_gate_core::Entitlement;
use passport_gate_core::EntitlementRules;
use passport_gate_core::IdentityId;
use passport_gate_core::InMemoryCatalogStore;
use passport_gate_core::OwnershipCheck;
use passport_gate_core::OwnershipGuard;
use passport_gate_core::PlanName;
use passport_gate_core::Product;
use passport_gate_core::ProductId;
use passport_gate_core::ProductLimit;
use passport_gate_core::QuotaEnforcer;
use passport_gate_core::ResourceRef;
use passport_gate_core::StoreError;
use passport_gate_core::SubscriptionStatus;
use passport_gate_core::Tenant;
use passport_gate_core::TenantId;
use passport_gate_core::TenantStore;
use proptest::prelude::*;

/// Tenant store that reports a fixed product count.
struct FixedCountStore {
    count: u32,
}

impl TenantStore for FixedCountStore {
    fn tenants_for_owner(&self, _owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        Ok(Vec::new())
    }

    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError> {
        Ok(tenant.clone())
    }

    fn count_products(&self, _tenant_id: &TenantId) -> Result<u32, StoreError> {
        Ok(self.count)
    }
}

fn tenant(status: SubscriptionStatus, plan: PlanName) -> Tenant {
    Tenant {
        tenant_id: TenantId::new("brand-1"),
        owner_id: IdentityId::new("user-1"),
        name: "Acme Apparel".to_string(),
        subscription_status: status,
        plan_name: plan,
    }
}

fn status_strategy() -> impl Strategy<Value = SubscriptionStatus> {
    prop::sample::select(vec![
        SubscriptionStatus::Free,
        SubscriptionStatus::Active,
        SubscriptionStatus::Canceled,
        SubscriptionStatus::PastDue,
        SubscriptionStatus::Trialing,
    ])
}

fn plan_strategy() -> impl Strategy<Value = PlanName> {
    prop::sample::select(vec![
        PlanName::Free,
        PlanName::Starter,
        PlanName::Pro,
        PlanName::Enterprise,
    ])
}

proptest! {
    #[test]
    fn quota_decision_matches_cap_arithmetic(
        max in 0_u32 .. 60,
        current in 0_u32 .. 60,
        requested in 0_u32 .. 60,
    ) {
        let store = FixedCountStore { count: current };
        let enforcer = QuotaEnforcer::new(&store);
        let snapshot = tenant(SubscriptionStatus::Free, PlanName::Free);
        let entitlement = Entitlement::free_tier(max);
        let decision = enforcer.check_create(&snapshot, &entitlement, requested).unwrap();
        if current + requested <= max {
            match decision {
                Decision::Allow { remaining, .. } => {
                    prop_assert_eq!(remaining, Some(max - current - requested));
                }
                Decision::Deny { .. } => prop_assert!(false, "expected allow"),
            }
        } else {
            prop_assert_eq!(
                decision.reason(),
                Some(&DenyReason::QuotaExceeded { current, requested, max })
            );
        }
    }

    #[test]
    fn unlimited_plans_never_deny_on_quota(
        current in 0_u32 .. 1000,
        requested in 0_u32 .. 1000,
    ) {
        let store = FixedCountStore { count: current };
        let enforcer = QuotaEnforcer::new(&store);
        let snapshot = tenant(SubscriptionStatus::Active, PlanName::Pro);
        let decision = enforcer.check_create(&snapshot, &Entitlement::full(), requested).unwrap();
        prop_assert!(decision.is_allow());
    }

    #[test]
    fn entitlement_resolution_is_deterministic(
        status in status_strategy(),
        plan in plan_strategy(),
        cap in 0_u32 .. 1000,
    ) {
        let rules = EntitlementRules::new(cap);
        let snapshot = tenant(status, plan);
        let first = rules.resolve(&snapshot);
        let second = rules.resolve(&snapshot);
        prop_assert_eq!(first, second);
        if status.is_active() {
            prop_assert_eq!(first.max_products, ProductLimit::Unlimited);
            prop_assert!(first.can_upload_certificates);
        } else {
            prop_assert_eq!(first.max_products, ProductLimit::Limited(cap));
            prop_assert!(!first.can_upload_certificates);
        }
    }

    #[test]
    fn chain_links_resolve_to_the_same_owner_verdict(
        chain_owned_by_caller in any::<bool>(),
    ) {
        let store = InMemoryCatalogStore::new();
        let brand = if chain_owned_by_caller { "brand-1" } else { "brand-2" };
        store.insert_product(Product {
            product_id: ProductId::new("product-x"),
            brand_id: TenantId::new(brand),
            name: "Organic Hoodie".to_string(),
        }).unwrap();
        store.insert_component(Component {
            component_id: ComponentId::new("component-x"),
            product_id: ProductId::new("product-x"),
            name: "Cotton Shell".to_string(),
        }).unwrap();
        store.insert_certificate(Certificate {
            certificate_id: CertificateId::new("certificate-x"),
            component_id: ComponentId::new("component-x"),
            name: "GOTS".to_string(),
        }).unwrap();

        let guard = OwnershipGuard::new(&store);
        let caller = Tenant {
            tenant_id: TenantId::new("brand-1"),
            owner_id: IdentityId::new("user-1"),
            name: "Acme Apparel".to_string(),
            subscription_status: SubscriptionStatus::Active,
            plan_name: PlanName::Pro,
        };
        let refs = [
            ResourceRef::Product(ProductId::new("product-x")),
            ResourceRef::Component(ComponentId::new("component-x")),
            ResourceRef::Certificate(CertificateId::new("certificate-x")),
        ];
        for resource in refs {
            let check = guard.assert_owned(&caller, &resource).unwrap();
            prop_assert_eq!(
                matches!(check, OwnershipCheck::Owned(_)),
                chain_owned_by_caller,
                "every chain link must share the product's verdict"
            );
        }
    }
}
