//! Injectable diagnostics sink
//!
//! The coordinator reports noteworthy frame events (rejected targets,
//! hostiles near a move target, hits) through a `DiagnosticsSink` it owns,
//! instead of writing to a process-wide overlay.

use std::sync::{Arc, Mutex};

/// Severity of a diagnostic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Receiver for coordinator diagnostics
pub trait DiagnosticsSink {
    fn record(&self, message: &str, level: DiagnosticLevel);
}

/// Forwards records to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, message: &str, level: DiagnosticLevel) {
        match level {
            DiagnosticLevel::Trace => tracing::trace!(target: "shadowstep::diagnostics", "{}", message),
            DiagnosticLevel::Debug => tracing::debug!(target: "shadowstep::diagnostics", "{}", message),
            DiagnosticLevel::Info => tracing::info!(target: "shadowstep::diagnostics", "{}", message),
            DiagnosticLevel::Warn => tracing::warn!(target: "shadowstep::diagnostics", "{}", message),
            DiagnosticLevel::Error => tracing::error!(target: "shadowstep::diagnostics", "{}", message),
        }
    }
}

/// A single captured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Keeps records in memory; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records at or above `level`
    pub fn at_least(&self, level: DiagnosticLevel) -> Vec<DiagnosticRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level >= level)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, message: &str, level: DiagnosticLevel) {
        if let Ok(mut records) = self.records.lock() {
            records.push(DiagnosticRecord {
                level,
                message: message.to_string(),
            });
        }
    }
}
