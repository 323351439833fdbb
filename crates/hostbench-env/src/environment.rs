//! Test environment contract and the shared verification routine.
//!
//! A variant decides how the payloads reach the subject and what the root
//! transaction is called when the test does not say. Everything else is
//! shared and lives in [`crate::orchestrator`] and
//! [`verify_root_transaction`].

use async_trait::async_trait;
use hostbench_config::AppCodeHostKind;
use uuid::Uuid;

use crate::error::{HarnessError, Mismatch, Result, TransactionField};
use crate::properties::TestProperties;
use crate::telemetry::TransactionData;

/// Both shared data payloads as JSON text, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPayloads {
    run_id: Uuid,
    app_code_host_kind: AppCodeHostKind,
    per_process: String,
    per_request: String,
}

impl SerializedPayloads {
    /// Wraps already serialized payloads.
    ///
    /// `app_code_host_kind` must be the kind written into `per_process`.
    #[must_use]
    pub const fn new(
        run_id: Uuid,
        app_code_host_kind: AppCodeHostKind,
        per_process: String,
        per_request: String,
    ) -> Self {
        Self {
            run_id,
            app_code_host_kind,
            per_process,
            per_request,
        }
    }

    /// Run the payloads belong to.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Host kind carried in `SharedDataPerProcess`.
    #[must_use]
    pub const fn app_code_host_kind(&self) -> AppCodeHostKind {
        self.app_code_host_kind
    }

    /// `SharedDataPerProcess` JSON.
    #[must_use]
    pub fn per_process(&self) -> &str {
        &self.per_process
    }

    /// `SharedDataPerRequest` JSON.
    #[must_use]
    pub fn per_request(&self) -> &str {
        &self.per_request
    }
}

/// A way of running app code under the agent.
#[async_trait]
pub trait TestEnvironment: Send + Sync {
    /// Delivers the payloads, runs the subject and waits for it to finish.
    ///
    /// # Errors
    /// Returns [`HarnessError::ProcessLaunch`] if the subject cannot be
    /// started or does not exit cleanly, and [`HarnessError::Config`] or
    /// [`HarnessError::Serialization`] if the delivery cannot be composed.
    async fn deliver_and_run(
        &self,
        properties: &TestProperties,
        payloads: &SerializedPayloads,
    ) -> Result<()>;

    /// Root transaction name expected when the test sets none.
    fn default_transaction_name(&self) -> &str;

    /// Root transaction type expected when the test sets none.
    fn default_transaction_type(&self) -> &str;
}

/// Checks the root transaction against `properties`, falling back to the
/// environment's defaults for unset expectations.
///
/// Name and type are checked independently and every mismatch is reported.
///
/// # Errors
/// Returns [`HarnessError::Verification`] listing each mismatch.
pub fn verify_root_transaction(
    env: &dyn TestEnvironment,
    properties: &TestProperties,
    root: &TransactionData,
) -> Result<()> {
    let checks = [
        (
            TransactionField::Name,
            properties.transaction_name(),
            env.default_transaction_name(),
            root.name.as_str(),
        ),
        (
            TransactionField::Type,
            properties.transaction_type(),
            env.default_transaction_type(),
            root.transaction_type.as_str(),
        ),
    ];

    let mismatches: Vec<Mismatch> = checks
        .into_iter()
        .filter_map(|(field, explicit, default, actual)| {
            let expected = explicit.unwrap_or(default);
            (expected != actual).then(|| Mismatch {
                field,
                expected: expected.to_string(),
                actual: actual.to_string(),
                from_default: explicit.is_none(),
            })
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::Verification { mismatches })
    }
}
