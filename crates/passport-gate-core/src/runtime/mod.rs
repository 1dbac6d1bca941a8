// crates/passport-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Passport Gate Runtime
// Description: Policy evaluation runtime composed from explicit steps.
// Purpose: Expose the resolver, guard, enforcer, engine, and support pieces.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime wires the core types and store interfaces into the policy
//! pipeline: tenant resolution, ownership walking, quota enforcement, and the
//! engine facade, plus audit sinks and an in-memory store for tests and
//! demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod engine;
pub mod ownership;
pub mod quota;
pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::DecisionAuditEvent;
pub use audit::DecisionAuditEventParams;
pub use audit::JsonlAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SharedAuditSink;
pub use engine::AuthorizeRequest;
pub use engine::PolicyEngine;
pub use engine::PolicyEngineConfig;
pub use engine::PolicyError;
pub use engine::interpret_insert_error;
pub use ownership::OwnershipCheck;
pub use ownership::OwnershipGuard;
pub use quota::QuotaEnforcer;
pub use resolver::TenantResolution;
pub use resolver::TenantResolver;
pub use store::InMemoryCatalogStore;
pub use store::SharedResourceStore;
pub use store::SharedTenantStore;
