// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # hostbench-process
//!
//! The "start process and block until exit" primitive used to run app code
//! hosts.
//!
//! - [`ProcessLauncher`]: the launch contract
//! - [`NativeLauncher`]: `tokio::process` implementation with an optional
//!   supervision timeout
//! - [`CommandLine`] / [`EnvVars`]: what gets executed, and with which
//!   environment overlay
//!
//! ## Example
//!
//! ```rust,ignore
//! use hostbench_process::{CommandLine, EnvVars, NativeLauncher, ProcessLauncher};
//!
//! let launcher = NativeLauncher::new().with_timeout(Duration::from_secs(30));
//! let cmd = CommandLine::new("php").arg("runCliScriptAppCodeHost.php");
//! let outcome = launcher.start_and_wait(&cmd, &EnvVars::new()).await?;
//! outcome.check(&cmd)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod launcher;
pub mod native;

pub use command::{CommandLine, EnvVars};
pub use error::{LaunchError, Result};
pub use launcher::{ExitOutcome, ProcessLauncher};
pub use native::NativeLauncher;
