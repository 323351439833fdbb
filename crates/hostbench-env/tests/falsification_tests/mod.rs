//! Falsification tests for hostbench.
//!
//! | Category | ID Range | Description |
//! |----------|----------|-------------|
//! | A | F001-F008 | Option registry and naming |
//! | B | F009-F014 | Shared data payloads |
//! | C | F015-F028 | Run orchestration |

// Allow test-specific patterns that are denied in production code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hostbench_config::{AppCodeHostKind, HarnessConfig};
use hostbench_env::{AgentConfigSetter, InMemoryTelemetry, TransactionData};
use hostbench_process::{CommandLine, EnvVars, ExitOutcome, ProcessLauncher};
use parking_lot::Mutex;

mod payloads;
mod registry;

/// Launcher that never spawns anything.
///
/// Records each call, pushes `emits` into the shared telemetry and reports
/// `exit_code`.
pub struct FakeHost {
    pub exit_code: i32,
    pub emits: Vec<TransactionData>,
    pub telemetry: Arc<InMemoryTelemetry>,
    pub calls: Mutex<Vec<(CommandLine, EnvVars)>>,
}

impl FakeHost {
    pub fn new(exit_code: i32, emits: Vec<TransactionData>) -> Arc<Self> {
        Arc::new(Self {
            exit_code,
            emits,
            telemetry: Arc::new(InMemoryTelemetry::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ProcessLauncher for FakeHost {
    async fn start_and_wait(
        &self,
        command: &CommandLine,
        env: &EnvVars,
    ) -> hostbench_process::Result<ExitOutcome> {
        self.calls.lock().push((command.clone(), env.clone()));
        for tx in &self.emits {
            self.telemetry.record(tx.clone());
        }
        Ok(ExitOutcome::exited(self.exit_code, Duration::ZERO))
    }
}

/// Shell script standing in for the PHP app code host.
///
/// It copies both payload variables into `capture_dir`, appends one
/// intake-v2 transaction named after itself, and exits with
/// `$HOSTBENCH_EXIT_CODE`.
pub const FAKE_APP_CODE_HOST_SCRIPT: &str = r#"#!/bin/sh
printf '%s' "$ELASTIC_APM_PHP_TESTS_SHARED_DATA_PER_PROCESS" > "$HOSTBENCH_CAPTURE_DIR/per_process.json"
printf '%s' "$ELASTIC_APM_PHP_TESTS_SHARED_DATA_PER_REQUEST" > "$HOSTBENCH_CAPTURE_DIR/per_request.json"
printf '{"metadata":{"service":{"name":"hostbench"}}}\n' >> "$HOSTBENCH_CAPTURE_DIR/intake.ndjson"
printf '{"transaction":{"id":"t1","name":"%s","type":"%s"}}\n' "$(basename "$0")" "${HOSTBENCH_TX_TYPE:-cli}" >> "$HOSTBENCH_CAPTURE_DIR/intake.ndjson"
exit "${HOSTBENCH_EXIT_CODE:-0}"
"#;

/// Agent config setter steering [`FAKE_APP_CODE_HOST_SCRIPT`].
#[derive(Debug, Clone)]
pub struct ScriptSetter {
    pub capture_dir: PathBuf,
    pub exit_code: i32,
    pub transaction_type: Option<String>,
}

impl AgentConfigSetter for ScriptSetter {
    fn additional_env_vars(&self) -> EnvVars {
        let mut env = EnvVars::new();
        env.insert(
            "HOSTBENCH_CAPTURE_DIR",
            self.capture_dir.display().to_string(),
        );
        env.insert("HOSTBENCH_EXIT_CODE", self.exit_code.to_string());
        if let Some(ref tx_type) = self.transaction_type {
            env.insert("HOSTBENCH_TX_TYPE", tx_type.as_str());
        }
        env
    }
}

/// Writes the fake host script into `dir` and returns a config running it with `/bin/sh`.
pub fn install_fake_host(dir: &Path) -> HarnessConfig {
    std::fs::write(
        dir.join(hostbench_env::SCRIPT_TO_RUN_APP_CODE_HOST),
        FAKE_APP_CODE_HOST_SCRIPT,
    )
    .unwrap();
    HarnessConfig {
        app_code_host_kind: AppCodeHostKind::CliScript,
        app_code_php_exe: Some("/bin/sh".to_string()),
        app_code_host_timeout: Duration::from_secs(10),
        ..HarnessConfig::default()
    }
}

/// Agent config setter that tries to set one variable to a junk value.
#[derive(Debug, Clone)]
pub struct OverridingSetter(pub String);

impl AgentConfigSetter for OverridingSetter {
    fn additional_env_vars(&self) -> EnvVars {
        let mut env = EnvVars::new();
        env.insert(self.0.as_str(), "{}");
        env
    }
}

/// Launcher that appends the next queued NDJSON line to an intake file on
/// each run, the way an agent reports to a mock APM server.
pub struct IntakeWritingHost {
    path: PathBuf,
    lines: Mutex<VecDeque<String>>,
}

impl IntakeWritingHost {
    pub fn new(path: &Path, lines: impl IntoIterator<Item = String>) -> Arc<Self> {
        Arc::new(Self {
            path: path.to_path_buf(),
            lines: Mutex::new(lines.into_iter().collect()),
        })
    }
}

#[async_trait]
impl ProcessLauncher for IntakeWritingHost {
    async fn start_and_wait(
        &self,
        _command: &CommandLine,
        _env: &EnvVars,
    ) -> hostbench_process::Result<ExitOutcome> {
        let line = self.lines.lock().pop_front().unwrap_or_default();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .unwrap();
        writeln!(file, "{line}").unwrap();
        Ok(ExitOutcome::exited(0, Duration::ZERO))
    }
}
