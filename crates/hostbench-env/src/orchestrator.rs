//! Runs one test end to end.
//!
//! # Run sequence
//! ```text
//! Idle → BuildingPayload → Serializing → Launching → Waiting → Verifying → Done
//!                 └──────────────┴────────────┴──────────┴──────────┴──→ Failed
//! ```
//! Any failure aborts the run; there is no partial success and no retry.

use std::sync::Arc;

use hostbench_config::{
    HarnessConfig, SHARED_DATA_PER_PROCESS_OPTION_NAME, SHARED_DATA_PER_REQUEST_OPTION_NAME,
    SharedDataPerProcess, SharedDataPerRequest,
};
use uuid::Uuid;

use crate::environment::{SerializedPayloads, TestEnvironment, verify_root_transaction};
use crate::error::{HarnessError, RunError, RunStep};
use crate::properties::TestProperties;
use crate::telemetry::{TelemetrySource, TransactionData};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Run identifier, also carried in `SharedDataPerProcess`.
    pub run_id: Uuid,
    /// Verified root transaction.
    pub root_transaction: TransactionData,
}

/// Drives test runs against any [`TestEnvironment`].
///
/// Runs take `&mut self`, so one orchestrator never has two runs in flight.
pub struct Orchestrator {
    config: HarnessConfig,
    telemetry: Arc<dyn TelemetrySource>,
    runs_completed: u64,
}

impl Orchestrator {
    /// Creates an orchestrator reading telemetry from `telemetry`.
    #[must_use]
    pub fn new(config: HarnessConfig, telemetry: Arc<dyn TelemetrySource>) -> Self {
        Self {
            config,
            telemetry,
            runs_completed: 0,
        }
    }

    /// Harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Number of runs that passed verification.
    #[must_use]
    pub const fn runs_completed(&self) -> u64 {
        self.runs_completed
    }

    /// Builds the per-process payload for a new run.
    ///
    /// An unset host kind is recorded as the CLI script kind the run will use.
    #[must_use]
    pub fn build_shared_data_per_process(&self, run_id: Uuid) -> SharedDataPerProcess {
        SharedDataPerProcess::new(
            run_id,
            std::process::id(),
            self.config.app_code_host_kind.resolved(),
        )
    }

    /// Runs the subject through `env` and verifies its root transaction.
    ///
    /// # Errors
    /// Returns a [`RunError`] naming the step that failed.
    pub async fn run(
        &mut self,
        env: &dyn TestEnvironment,
        properties: &TestProperties,
    ) -> Result<RunReport, RunError> {
        let run_id = Uuid::new_v4();
        let fail = |step: RunStep| move |source: HarnessError| RunError {
            run_id,
            step,
            source,
        };

        tracing::info!(run_id = %run_id, step = %RunStep::BuildingPayload, "starting test run");
        let per_process = self.build_shared_data_per_process(run_id);
        let per_request = properties.shared_data_per_request();

        tracing::debug!(run_id = %run_id, step = %RunStep::Serializing);
        let payloads = serialize_payloads(run_id, &per_process, per_request)
            .map_err(fail(RunStep::Serializing))?;

        tracing::debug!(run_id = %run_id, step = %RunStep::Launching);
        if let Err(source) = env.deliver_and_run(properties, &payloads).await {
            let step = match source {
                HarnessError::ProcessLaunch(_) => RunStep::Waiting,
                _ => RunStep::Launching,
            };
            tracing::error!(run_id = %run_id, step = %step, error = %source, "test run failed");
            return Err(fail(step)(source));
        }

        tracing::debug!(run_id = %run_id, step = %RunStep::Verifying);
        let root_transaction = self
            .telemetry
            .root_transaction()
            .await
            .map_err(fail(RunStep::Verifying))?;
        if let Err(source) = verify_root_transaction(env, properties, &root_transaction) {
            tracing::warn!(run_id = %run_id, error = %source, "verification failed");
            return Err(fail(RunStep::Verifying)(source));
        }

        self.runs_completed += 1;
        tracing::info!(
            run_id = %run_id,
            transaction_name = %root_transaction.name,
            transaction_type = %root_transaction.transaction_type,
            "test run passed"
        );

        Ok(RunReport {
            run_id,
            root_transaction,
        })
    }
}

fn serialize_payloads(
    run_id: Uuid,
    per_process: &SharedDataPerProcess,
    per_request: &SharedDataPerRequest,
) -> Result<SerializedPayloads, HarnessError> {
    let per_process_json = per_process.to_json().map_err(|e| {
        HarnessError::serialization(SHARED_DATA_PER_PROCESS_OPTION_NAME, e.to_string())
    })?;
    let per_request_json = per_request.to_json().map_err(|e| {
        HarnessError::serialization(SHARED_DATA_PER_REQUEST_OPTION_NAME, e.to_string())
    })?;
    Ok(SerializedPayloads::new(
        run_id,
        per_process.app_code_host_kind(),
        per_process_json,
        per_request_json,
    ))
}
