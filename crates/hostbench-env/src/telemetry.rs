//! Telemetry recorded by the agent for a run.
//!
//! The orchestrator only reads the root transaction's `name` and `type`.
//! Sources decide where the events come from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HarnessError, Result};

/// One recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Transaction ID.
    pub id: String,
    /// Transaction name.
    pub name: String,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Parent span or transaction, absent for a root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Trace ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl TransactionData {
    /// Creates a root transaction.
    #[must_use]
    pub fn root(
        id: impl Into<String>,
        name: impl Into<String>,
        transaction_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transaction_type: transaction_type.into(),
            parent_id: None,
            trace_id: None,
        }
    }

    /// Returns true if this transaction has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Supplies the root transaction of the most recent run.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Returns the single root transaction recorded since the previous call.
    ///
    /// # Errors
    /// Fails if telemetry is unreadable, or if there is no root transaction
    /// or more than one.
    async fn root_transaction(&self) -> Result<TransactionData>;
}

/// Transactions recorded in process; each fetch drains them.
#[derive(Debug, Default)]
pub struct InMemoryTelemetry {
    transactions: Mutex<Vec<TransactionData>>,
}

impl InMemoryTelemetry {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a transaction.
    pub fn record(&self, transaction: TransactionData) {
        self.transactions.lock().push(transaction);
    }

    /// Number of transactions waiting to be fetched.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.transactions.lock().len()
    }
}

#[async_trait]
impl TelemetrySource for InMemoryTelemetry {
    async fn root_transaction(&self) -> Result<TransactionData> {
        let transactions = std::mem::take(&mut *self.transactions.lock());
        single_root(transactions)
    }
}

/// Reads intake-v2 NDJSON events written by a mock APM server.
///
/// Each line is an object with one key naming the event kind (`metadata`,
/// `transaction`, `span`, `error`, `metricset`). The file is truncated on
/// every fetch, including one that fails to parse, so the next run starts
/// clean.
#[derive(Debug, Clone)]
pub struct IntakeFileTelemetry {
    path: PathBuf,
}

impl IntakeFileTelemetry {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TelemetrySource for IntakeFileTelemetry {
    async fn root_transaction(&self) -> Result<TransactionData> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HarnessError::telemetry(format!("failed to read {}: {e}", self.path.display()))
        })?;
        tokio::fs::write(&self.path, b"").await.map_err(|e| {
            HarnessError::telemetry(format!("failed to truncate {}: {e}", self.path.display()))
        })?;

        let transactions = parse_intake_transactions(&content)?;
        tracing::debug!(path = %self.path.display(), transactions = transactions.len(), "read intake events");
        single_root(transactions)
    }
}

/// Extracts every `transaction` event from intake-v2 NDJSON text.
///
/// # Errors
/// Fails on a malformed line, naming its 1-based line number.
pub fn parse_intake_transactions(ndjson: &str) -> Result<Vec<TransactionData>> {
    let mut transactions = Vec::new();
    for (idx, line) in ndjson.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let event: Value = serde_json::from_str(line).map_err(|e| {
            HarnessError::telemetry(format!("line {line_no}: malformed JSON: {e}"))
        })?;
        let Value::Object(mut event) = event else {
            return Err(HarnessError::telemetry(format!(
                "line {line_no}: event is not a JSON object"
            )));
        };
        if let Some(transaction) = event.remove("transaction") {
            let transaction = serde_json::from_value(transaction).map_err(|e| {
                HarnessError::telemetry(format!("line {line_no}: invalid transaction: {e}"))
            })?;
            transactions.push(transaction);
        }
    }
    Ok(transactions)
}

fn single_root(transactions: Vec<TransactionData>) -> Result<TransactionData> {
    let mut roots = transactions.into_iter().filter(TransactionData::is_root);
    match (roots.next(), roots.next()) {
        (Some(root), None) => Ok(root),
        (None, _) => Err(HarnessError::telemetry("no root transaction was recorded")),
        (Some(_), Some(_)) => Err(HarnessError::telemetry(format!(
            "expected exactly one root transaction, found {}",
            2 + roots.count()
        ))),
    }
}
