// crates/passport-gate-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Catalog Store
// Description: Durable catalog store backend using SQLite WAL.
// Purpose: Provide production-grade persistence for Passport Gate catalogs.
// ============================================================================

//! ## Overview
//! This crate provides an `SQLite`-backed implementation of the Passport Gate
//! catalog store contracts. The database schema carries the uniqueness and
//! foreign-key constraints the policy engine relies on as final arbiters, so
//! concurrent writers cannot corrupt the tenant-per-owner invariant.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteCatalogStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
