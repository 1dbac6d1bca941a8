// crates/passport-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Decision Audit Logging
// Description: Structured audit events for policy decisions.
// Purpose: Emit decision records without hard logging dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks for decision
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. Sinks are
//! best-effort: recording never fails the authorize call that produced the
//! event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Caller-supplied decision timestamp.
    pub at: Timestamp,
    /// Identity making the request.
    pub identity_id: String,
    /// Whether the identity was authenticated.
    pub authenticated: bool,
    /// Resolved tenant identifier when available.
    pub tenant_id: Option<String>,
    /// Action label.
    pub action: &'static str,
    /// Whether the action was allowed.
    pub allowed: bool,
    /// Denial or error reason label when the action was not allowed.
    pub reason: Option<&'static str>,
    /// Current product count on quota denials.
    pub quota_current: Option<u32>,
    /// Requested batch size on quota denials.
    pub quota_requested: Option<u32>,
    /// Product cap on quota denials.
    pub quota_max: Option<u32>,
    /// Correlation identifier when provided by the caller.
    pub correlation_id: Option<String>,
}

/// Inputs required to construct a decision audit event.
pub struct DecisionAuditEventParams {
    /// Caller-supplied decision timestamp.
    pub at: Timestamp,
    /// Identity making the request.
    pub identity_id: String,
    /// Whether the identity was authenticated.
    pub authenticated: bool,
    /// Resolved tenant identifier when available.
    pub tenant_id: Option<String>,
    /// Action label.
    pub action: &'static str,
    /// Whether the action was allowed.
    pub allowed: bool,
    /// Denial or error reason label when the action was not allowed.
    pub reason: Option<&'static str>,
    /// Current product count on quota denials.
    pub quota_current: Option<u32>,
    /// Requested batch size on quota denials.
    pub quota_requested: Option<u32>,
    /// Product cap on quota denials.
    pub quota_max: Option<u32>,
    /// Correlation identifier when provided by the caller.
    pub correlation_id: Option<String>,
}

impl DecisionAuditEvent {
    /// Creates a new decision audit event with a stable event label.
    #[must_use]
    pub fn new(params: DecisionAuditEventParams) -> Self {
        Self {
            event: "policy_decision",
            at: params.at,
            identity_id: params.identity_id,
            authenticated: params.authenticated,
            tenant_id: params.tenant_id,
            action: params.action,
            allowed: params.allowed,
            reason: params.reason,
            quota_current: params.quota_current,
            quota_requested: params.quota_requested,
            quota_max: params.quota_max,
            correlation_id: params.correlation_id,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for decision events.
pub trait AuditSink: Send + Sync {
    /// Records a decision audit event.
    fn record(&self, event: &DecisionAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &DecisionAuditEvent) {}
}

/// Audit sink that buffers events in memory for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditSink {
    /// Recorded events protected by a mutex.
    events: Arc<Mutex<Vec<DecisionAuditEvent>>>,
}

impl MemoryAuditSink {
    /// Creates a new empty memory audit sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DecisionAuditEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct JsonlAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl JsonlAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

// ============================================================================
// SECTION: Shared Sink Wrapper
// ============================================================================

/// Shared audit sink backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedAuditSink {
    /// Inner sink implementation.
    inner: Arc<dyn AuditSink>,
}

impl SharedAuditSink {
    /// Wraps an audit sink in a shared, clonable wrapper.
    #[must_use]
    pub fn from_sink(sink: impl AuditSink + 'static) -> Self {
        Self {
            inner: Arc::new(sink),
        }
    }

    /// Wraps an existing shared sink.
    #[must_use]
    pub const fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            inner: sink,
        }
    }

    /// Creates a shared no-op sink.
    #[must_use]
    pub fn noop() -> Self {
        Self::from_sink(NoopAuditSink)
    }
}

impl AuditSink for SharedAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        self.inner.record(event);
    }
}
