// crates/passport-gate-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Catalog Store
// Description: Durable TenantStore and ResourceStore backed by SQLite WAL.
// Purpose: Persist catalog rows with constraint-enforced invariants.
// Dependencies: passport-gate-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements the catalog store contracts on top of `SQLite`. The
//! schema carries a UNIQUE index on `tenants.owner_id`, making the database
//! the final arbiter of the tenant-per-owner invariant: a constraint
//! violation on insert surfaces as [`StoreError::UniqueViolation`] and the
//! policy engine converts it into a normal denial. Reads are single-row
//! lookups matching the chain-walk contract; no joins are performed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use passport_gate_core::Certificate;
use passport_gate_core::CertificateId;
use passport_gate_core::Component;
use passport_gate_core::ComponentId;
use passport_gate_core::IdentityId;
use passport_gate_core::PlanName;
use passport_gate_core::Product;
use passport_gate_core::ProductId;
use passport_gate_core::ResourceStore;
use passport_gate_core::StoreError;
use passport_gate_core::SubscriptionStatus;
use passport_gate_core::Supplier;
use passport_gate_core::SupplierId;
use passport_gate_core::Tenant;
use passport_gate_core::TenantId;
use passport_gate_core::TenantStore;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` catalog store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored rows violate an integrity expectation.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// A uniqueness constraint rejected the write.
    #[error("sqlite store unique constraint violation: {0}")]
    UniqueViolation(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::UniqueViolation(message) => Self::UniqueViolation(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed catalog store with WAL support.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// Opens an `SQLite`-backed catalog store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Inserts a product row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert fails or violates a
    /// constraint.
    pub fn insert_product(&self, product: &Product) -> Result<(), SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO products (product_id, brand_id, name) VALUES (?1, ?2, ?3)",
                params![product.product_id.as_str(), product.brand_id.as_str(), product.name],
            )
            .map_err(map_constraint_error)?;
        Ok(())
    }

    /// Inserts a component row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert fails or violates a
    /// constraint.
    pub fn insert_component(&self, component: &Component) -> Result<(), SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO components (component_id, product_id, name) VALUES (?1, ?2, ?3)",
                params![
                    component.component_id.as_str(),
                    component.product_id.as_str(),
                    component.name
                ],
            )
            .map_err(map_constraint_error)?;
        Ok(())
    }

    /// Inserts a certificate row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert fails or violates a
    /// constraint.
    pub fn insert_certificate(&self, certificate: &Certificate) -> Result<(), SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO certificates (certificate_id, component_id, name) VALUES (?1, ?2, \
                 ?3)",
                params![
                    certificate.certificate_id.as_str(),
                    certificate.component_id.as_str(),
                    certificate.name
                ],
            )
            .map_err(map_constraint_error)?;
        Ok(())
    }

    /// Inserts a supplier row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert fails or violates a
    /// constraint.
    pub fn insert_supplier(&self, supplier: &Supplier) -> Result<(), SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO suppliers (supplier_id, brand_id, name) VALUES (?1, ?2, ?3)",
                params![supplier.supplier_id.as_str(), supplier.brand_id.as_str(), supplier.name],
            )
            .map_err(map_constraint_error)?;
        Ok(())
    }

    /// Locks the shared connection, mapping poisoning to a store error.
    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("connection mutex poisoned".to_string()))
    }

    /// Loads every tenant row owned by the identity.
    fn load_tenants(&self, owner_id: &IdentityId) -> Result<Vec<Tenant>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        let mut statement = guard
            .prepare(
                "SELECT tenant_id, owner_id, name, subscription_status, plan_name FROM tenants \
                 WHERE owner_id = ?1",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(params![owner_id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut tenants = Vec::new();
        for row in rows {
            let (tenant_id, owner, name, status, plan) =
                row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tenants.push(Tenant {
                tenant_id: TenantId::new(tenant_id),
                owner_id: IdentityId::new(owner),
                name,
                subscription_status: parse_subscription_status(&status)?,
                plan_name: parse_plan_name(&plan)?,
            });
        }
        Ok(tenants)
    }

    /// Inserts a tenant row, surfacing constraint violations distinctly.
    fn insert_tenant_row(&self, tenant: &Tenant) -> Result<Tenant, SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .execute(
                "INSERT INTO tenants (tenant_id, owner_id, name, subscription_status, plan_name) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    tenant.tenant_id.as_str(),
                    tenant.owner_id.as_str(),
                    tenant.name,
                    subscription_status_label(tenant.subscription_status),
                    plan_name_label(tenant.plan_name)
                ],
            )
            .map_err(map_constraint_error)?;
        Ok(tenant.clone())
    }

    /// Counts the products currently owned by the tenant.
    fn product_count(&self, tenant_id: &TenantId) -> Result<u32, SqliteStoreError> {
        let guard = self.lock_connection()?;
        let count: i64 = guard
            .query_row(
                "SELECT COUNT(*) FROM products WHERE brand_id = ?1",
                params![tenant_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Loads a product row by identifier.
    fn load_product(&self, product_id: &ProductId) -> Result<Option<Product>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .query_row(
                "SELECT product_id, brand_id, name FROM products WHERE product_id = ?1",
                params![product_id.as_str()],
                |row| {
                    Ok(Product {
                        product_id: ProductId::new(row.get::<_, String>(0)?),
                        brand_id: TenantId::new(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }

    /// Loads a component row by identifier.
    fn load_component(
        &self,
        component_id: &ComponentId,
    ) -> Result<Option<Component>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .query_row(
                "SELECT component_id, product_id, name FROM components WHERE component_id = ?1",
                params![component_id.as_str()],
                |row| {
                    Ok(Component {
                        component_id: ComponentId::new(row.get::<_, String>(0)?),
                        product_id: ProductId::new(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }

    /// Loads a certificate row by identifier.
    fn load_certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<Certificate>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .query_row(
                "SELECT certificate_id, component_id, name FROM certificates WHERE \
                 certificate_id = ?1",
                params![certificate_id.as_str()],
                |row| {
                    Ok(Certificate {
                        certificate_id: CertificateId::new(row.get::<_, String>(0)?),
                        component_id: ComponentId::new(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }

    /// Loads a supplier row by identifier.
    fn load_supplier(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Option<Supplier>, SqliteStoreError> {
        let guard = self.lock_connection()?;
        guard
            .query_row(
                "SELECT supplier_id, brand_id, name FROM suppliers WHERE supplier_id = ?1",
                params![supplier_id.as_str()],
                |row| {
                    Ok(Supplier {
                        supplier_id: SupplierId::new(row.get::<_, String>(0)?),
                        brand_id: TenantId::new(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }
}

impl TenantStore for SqliteCatalogStore {
    fn tenants_for_owner(&self, owner_id: &IdentityId) -> Result<Vec<Tenant>, StoreError> {
        self.load_tenants(owner_id).map_err(StoreError::from)
    }

    fn insert_tenant(&self, tenant: &Tenant) -> Result<Tenant, StoreError> {
        self.insert_tenant_row(tenant).map_err(StoreError::from)
    }

    fn count_products(&self, tenant_id: &TenantId) -> Result<u32, StoreError> {
        self.product_count(tenant_id).map_err(StoreError::from)
    }
}

impl ResourceStore for SqliteCatalogStore {
    fn product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.load_product(product_id).map_err(StoreError::from)
    }

    fn component(&self, component_id: &ComponentId) -> Result<Option<Component>, StoreError> {
        self.load_component(component_id).map_err(StoreError::from)
    }

    fn certificate(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        self.load_certificate(certificate_id).map_err(StoreError::from)
    }

    fn supplier(&self, supplier_id: &SupplierId) -> Result<Option<Supplier>, StoreError> {
        self.load_supplier(supplier_id).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS tenants (
                    tenant_id TEXT PRIMARY KEY,
                    owner_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    subscription_status TEXT NOT NULL,
                    plan_name TEXT NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS idx_tenants_owner_id
                    ON tenants (owner_id);
                CREATE TABLE IF NOT EXISTS products (
                    product_id TEXT PRIMARY KEY,
                    brand_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    FOREIGN KEY (brand_id) REFERENCES tenants(tenant_id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_products_brand_id
                    ON products (brand_id);
                CREATE TABLE IF NOT EXISTS components (
                    component_id TEXT PRIMARY KEY,
                    product_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    FOREIGN KEY (product_id) REFERENCES products(product_id) ON DELETE CASCADE
                );
                CREATE TABLE IF NOT EXISTS certificates (
                    certificate_id TEXT PRIMARY KEY,
                    component_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    FOREIGN KEY (component_id) REFERENCES components(component_id) ON DELETE \
                 CASCADE
                );
                CREATE TABLE IF NOT EXISTS suppliers (
                    supplier_id TEXT PRIMARY KEY,
                    brand_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    FOREIGN KEY (brand_id) REFERENCES tenants(tenant_id) ON DELETE CASCADE
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::Invalid(format!("unsupported schema version: {value}")));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Maps uniqueness constraint failures to the distinct violation variant.
fn map_constraint_error(error: rusqlite::Error) -> SqliteStoreError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &error
        && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    {
        return SqliteStoreError::UniqueViolation(
            message.clone().unwrap_or_else(|| "unique constraint violation".to_string()),
        );
    }
    SqliteStoreError::Db(error.to_string())
}

/// Returns the canonical subscription status label.
const fn subscription_status_label(status: SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Free => "free",
        SubscriptionStatus::Active => "active",
        SubscriptionStatus::Canceled => "canceled",
        SubscriptionStatus::PastDue => "past_due",
        SubscriptionStatus::Trialing => "trialing",
    }
}

/// Parses a subscription status label.
fn parse_subscription_status(label: &str) -> Result<SubscriptionStatus, SqliteStoreError> {
    match label {
        "free" => Ok(SubscriptionStatus::Free),
        "active" => Ok(SubscriptionStatus::Active),
        "canceled" => Ok(SubscriptionStatus::Canceled),
        "past_due" => Ok(SubscriptionStatus::PastDue),
        "trialing" => Ok(SubscriptionStatus::Trialing),
        other => {
            Err(SqliteStoreError::Corrupt(format!("unknown subscription status: {other}")))
        }
    }
}

/// Returns the canonical plan name label.
const fn plan_name_label(plan: PlanName) -> &'static str {
    match plan {
        PlanName::Free => "free",
        PlanName::Starter => "starter",
        PlanName::Pro => "pro",
        PlanName::Enterprise => "enterprise",
    }
}

/// Parses a plan name label.
fn parse_plan_name(label: &str) -> Result<PlanName, SqliteStoreError> {
    match label {
        "free" => Ok(PlanName::Free),
        "starter" => Ok(PlanName::Starter),
        "pro" => Ok(PlanName::Pro),
        "enterprise" => Ok(PlanName::Enterprise),
        other => Err(SqliteStoreError::Corrupt(format!("unknown plan name: {other}"))),
    }
}
