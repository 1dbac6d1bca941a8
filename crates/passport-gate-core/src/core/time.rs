// crates/passport-gate-core/src/core/time.rs
// ============================================================================
// Module: Passport Gate Time Model
// Description: Canonical timestamp representation for audit records.
// Purpose: Provide deterministic, replayable time values across decision logs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Passport Gate uses explicit time values embedded in authorize requests and
//! audit records to keep replay deterministic. The engine never reads
//! wall-clock time directly; hosts must supply timestamps with each call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in decision audit records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the engine never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }
}
