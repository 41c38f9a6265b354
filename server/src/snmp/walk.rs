//! Walk executor. Runs one net-snmp walk per call and never fails.
//!
//! Every failure mode (missing tool, non-zero exit, hard timeout) degrades to
//! [`WalkOutput::Empty`] so a broken subtree costs the client table a column
//! instead of the whole request.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::{SnmpVersion, Target};
use crate::config::SnmpConfig;

/// Why a walk produced no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The tool could not be started.
    SpawnFailed(String),
    /// The tool exited unsuccessfully (`None` when killed by a signal).
    ExitStatus(Option<i32>),
    /// The wall-clock budget ran out and the process was killed.
    TimedOut,
    /// The tool succeeded but printed nothing.
    NoOutput,
}

/// Result of a single walk: raw text, or nothing and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutput {
    Text(String),
    Empty(EmptyReason),
}

impl WalkOutput {
    /// The walk text, `""` when the walk degraded.
    pub fn text(&self) -> &str {
        match self {
            WalkOutput::Text(text) => text,
            WalkOutput::Empty(_) => "",
        }
    }
}

impl From<String> for WalkOutput {
    fn from(text: String) -> Self {
        if text.trim().is_empty() {
            WalkOutput::Empty(EmptyReason::NoOutput)
        } else {
            WalkOutput::Text(text)
        }
    }
}

/// Something that can walk an OID subtree on a target device.
pub trait Walker: Send + Sync {
    fn walk(&self, target: &Target, oid: &str) -> impl Future<Output = WalkOutput> + Send;
}

/// Walks by spawning `snmpwalk` / `snmpbulkwalk`.
#[derive(Debug, Clone)]
pub struct CommandWalker {
    config: SnmpConfig,
}

impl CommandWalker {
    pub fn new(config: SnmpConfig) -> Self {
        Self { config }
    }

    /// Tool for the given protocol version: GETNEXT walk for v1, GETBULK otherwise.
    fn program(&self, version: SnmpVersion) -> &str {
        match version {
            SnmpVersion::V1 => &self.config.walk_command,
            SnmpVersion::V2c => &self.config.bulkwalk_command,
        }
    }

    /// Arguments in the order net-snmp expects: options, agent, OID.
    fn args(&self, target: &Target, oid: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            target.version.as_arg().to_string(),
            "-c".to_string(),
            target.community.clone(),
            "-On".to_string(),
            "-t".to_string(),
            self.config.timeout_secs.to_string(),
            "-r".to_string(),
            self.config.retries.to_string(),
            target.host.clone(),
            oid.to_string(),
        ]
    }
}

impl Walker for CommandWalker {
    async fn walk(&self, target: &Target, oid: &str) -> WalkOutput {
        let program = self.program(target.version);
        let budget = Duration::from_secs(self.config.hard_timeout_secs);

        // Dropping the output future on timeout kills the child.
        let result = tokio::time::timeout(budget, async {
            Command::new(program)
                .args(self.args(target, oid))
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
        })
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                debug!(
                    host = %target.host,
                    oid,
                    bytes = stdout.len(),
                    "SNMP walk completed"
                );
                WalkOutput::from(stdout)
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    host = %target.host,
                    oid,
                    status = %output.status,
                    "SNMP walk failed: {}",
                    stderr.trim()
                );
                WalkOutput::Empty(EmptyReason::ExitStatus(output.status.code()))
            }
            Ok(Err(e)) => {
                warn!(host = %target.host, oid, "Failed to execute {program}: {e}");
                WalkOutput::Empty(EmptyReason::SpawnFailed(e.to_string()))
            }
            Err(_) => {
                warn!(
                    host = %target.host,
                    oid,
                    "SNMP walk timed out ({}s)",
                    budget.as_secs()
                );
                WalkOutput::Empty(EmptyReason::TimedOut)
            }
        }
    }
}
