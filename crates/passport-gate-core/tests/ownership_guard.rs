// crates/passport-gate-core/tests/ownership_guard.rs
// ============================================================================
// Module: Ownership Guard Tests
// Description: Unit tests for transitive ownership chain walking.
// Purpose: Verify chain resolution and the merged missing/foreign outcome.
// ============================================================================

//! Unit tests for the resource ownership guard.

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
use passport_gate_core::IdentityId;
use passport_gate_core::InMemoryCatalogStore;
use passport_gate_core::OwnershipCheck;
use passport_gate_core::OwnershipGuard;
use passport_gate_core::PlanName;
use passport_gate_core::Product;
use passport_gate_core::ProductId;
use passport_gate_core::Resource;
use passport_gate_core::ResourceRef;
use passport_gate_core::SubscriptionStatus;
use passport_gate_core::Supplier;
use passport_gate_core::SupplierId;
use passport_gate_core::Tenant;
use passport_gate_core::TenantId;

fn tenant(tenant_id: &str) -> Tenant {
    Tenant {
        tenant_id: TenantId::new(tenant_id),
        owner_id: IdentityId::new("user-1"),
        name: "Acme Apparel".to_string(),
        subscription_status: SubscriptionStatus::Active,
        plan_name: PlanName::Pro,
    }
}

/// Seeds a product, component, and certificate chain owned by `brand_id`.
fn seed_chain(store: &InMemoryCatalogStore, brand_id: &str) {
    store
        .insert_product(Product {
            product_id: ProductId::new("product-x"),
            brand_id: TenantId::new(brand_id),
            name: "Organic Hoodie".to_string(),
        })
        .unwrap();
    store
        .insert_component(Component {
            component_id: ComponentId::new("component-x"),
            product_id: ProductId::new("product-x"),
            name: "Cotton Shell".to_string(),
        })
        .unwrap();
    store
        .insert_certificate(Certificate {
            certificate_id: CertificateId::new("certificate-x"),
            component_id: ComponentId::new("component-x"),
            name: "GOTS".to_string(),
        })
        .unwrap();
}

#[test]
fn test_owned_product_resolves_to_its_row() {
    let store = InMemoryCatalogStore::new();
    seed_chain(&store, "brand-1");
    let guard = OwnershipGuard::new(&store);
    let check =
        guard.assert_owned(&tenant("brand-1"), &ResourceRef::Product(ProductId::new("product-x")));
    match check.unwrap() {
        OwnershipCheck::Owned(Resource::Product(product)) => {
            assert_eq!(product.product_id.as_str(), "product-x");
        }
        other => panic!("expected owned product, got {other:?}"),
    }
}

#[test]
fn test_component_ownership_follows_its_product() {
    let store = InMemoryCatalogStore::new();
    seed_chain(&store, "brand-1");
    let guard = OwnershipGuard::new(&store);
    let owned = guard
        .assert_owned(
            &tenant("brand-1"),
            &ResourceRef::Component(ComponentId::new("component-x")),
        )
        .unwrap();
    assert!(matches!(owned, OwnershipCheck::Owned(Resource::Component(_))));
    let foreign = guard
        .assert_owned(
            &tenant("brand-2"),
            &ResourceRef::Component(ComponentId::new("component-x")),
        )
        .unwrap();
    assert_eq!(foreign, OwnershipCheck::NotFoundOrForbidden);
}

#[test]
fn test_certificate_ownership_walks_the_full_chain() {
    let store = InMemoryCatalogStore::new();
    seed_chain(&store, "brand-1");
    let guard = OwnershipGuard::new(&store);
    let owned = guard
        .assert_owned(
            &tenant("brand-1"),
            &ResourceRef::Certificate(CertificateId::new("certificate-x")),
        )
        .unwrap();
    assert!(matches!(owned, OwnershipCheck::Owned(Resource::Certificate(_))));
}

#[test]
fn test_certificate_outcome_matches_its_product_outcome() {
    for brand in ["brand-1", "brand-2"] {
        let store = InMemoryCatalogStore::new();
        seed_chain(&store, brand);
        let guard = OwnershipGuard::new(&store);
        let caller = tenant("brand-1");
        let product_check = guard
            .assert_owned(&caller, &ResourceRef::Product(ProductId::new("product-x")))
            .unwrap();
        let certificate_check = guard
            .assert_owned(&caller, &ResourceRef::Certificate(CertificateId::new("certificate-x")))
            .unwrap();
        assert_eq!(
            matches!(product_check, OwnershipCheck::Owned(_)),
            matches!(certificate_check, OwnershipCheck::Owned(_)),
            "chain owned by {brand} must resolve uniformly"
        );
    }
}

#[test]
fn test_missing_and_foreign_resources_are_indistinguishable() {
    let store = InMemoryCatalogStore::new();
    seed_chain(&store, "brand-2");
    let guard = OwnershipGuard::new(&store);
    let caller = tenant("brand-1");
    let foreign = guard
        .assert_owned(&caller, &ResourceRef::Product(ProductId::new("product-x")))
        .unwrap();
    let missing = guard
        .assert_owned(&caller, &ResourceRef::Product(ProductId::new("product-missing")))
        .unwrap();
    assert_eq!(foreign, missing);
    assert_eq!(foreign, OwnershipCheck::NotFoundOrForbidden);
}

#[test]
fn test_broken_chain_link_is_reported_as_not_found_or_forbidden() {
    let store = InMemoryCatalogStore::new();
    store
        .insert_component(Component {
            component_id: ComponentId::new("component-orphan"),
            product_id: ProductId::new("product-gone"),
            name: "Orphan".to_string(),
        })
        .unwrap();
    let guard = OwnershipGuard::new(&store);
    let check = guard
        .assert_owned(
            &tenant("brand-1"),
            &ResourceRef::Component(ComponentId::new("component-orphan")),
        )
        .unwrap();
    assert_eq!(check, OwnershipCheck::NotFoundOrForbidden);
}

#[test]
fn test_supplier_ownership_is_checked_directly() {
    let store = InMemoryCatalogStore::new();
    store
        .insert_supplier(Supplier {
            supplier_id: SupplierId::new("supplier-x"),
            brand_id: TenantId::new("brand-1"),
            name: "Mill Co".to_string(),
        })
        .unwrap();
    let guard = OwnershipGuard::new(&store);
    let owned = guard
        .assert_owned(&tenant("brand-1"), &ResourceRef::Supplier(SupplierId::new("supplier-x")))
        .unwrap();
    assert!(matches!(owned, OwnershipCheck::Owned(Resource::Supplier(_))));
    let foreign = guard
        .assert_owned(&tenant("brand-2"), &ResourceRef::Supplier(SupplierId::new("supplier-x")))
        .unwrap();
    assert_eq!(foreign, OwnershipCheck::NotFoundOrForbidden);
}
