//! Fire-and-forget search audit records.
//!
//! After a successful search the pipeline hands an [`AuditRecord`] to an
//! [`AuditSink`] on a detached task. Sink failures are logged and dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use storefinder_core::AppConfig;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::pipeline::SearchOutcome;

/// Number of store names kept in an audit record.
pub const AUDIT_TOP_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub postal_code: String,
    pub radius_miles: f64,
    pub result_count: usize,
    /// Names of the nearest stores, at most [`AUDIT_TOP_RESULTS`].
    pub top_results: Vec<String>,
    pub searched_at: DateTime<Utc>,
}

impl AuditRecord {
    #[must_use]
    pub fn from_outcome(outcome: &SearchOutcome, searched_at: DateTime<Utc>) -> Self {
        Self {
            postal_code: outcome.location.postal_code.clone(),
            radius_miles: outcome.radius_miles,
            result_count: outcome.stores.len(),
            top_results: outcome
                .stores
                .iter()
                .take(AUDIT_TOP_RESULTS)
                .map(|s| s.name.clone())
                .collect(),
            searched_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord) -> BoxFuture<'_, Result<(), AuditError>>;
}

/// Emits each record as a structured `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) -> BoxFuture<'_, Result<(), AuditError>> {
        Box::pin(async move {
            tracing::info!(
                target: "storefinder::audit",
                postal_code = %record.postal_code,
                radius_miles = record.radius_miles,
                result_count = record.result_count,
                top_results = ?record.top_results,
                "search audited"
            );
            Ok(())
        })
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, record: AuditRecord) -> BoxFuture<'_, Result<(), AuditError>> {
        Box::pin(async move {
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');

            let _guard = self.write_lock.lock().await;
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
            Ok(())
        })
    }
}

/// JSON-lines file sink when `audit_log_path` is set, tracing otherwise.
#[must_use]
pub fn sink_for_config(config: &AppConfig) -> Arc<dyn AuditSink> {
    match &config.audit_log_path {
        Some(path) => Arc::new(JsonlAuditSink::new(path)),
        None => Arc::new(TracingAuditSink),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: AuditRecord) -> BoxFuture<'_, Result<(), AuditError>> {
        Box::pin(async { Ok(()) })
    }
}
