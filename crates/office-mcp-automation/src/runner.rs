//! Script execution

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{AutomationError, AutomationResult};

/// Runs one AppleScript program and returns its trimmed stdout
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, script: &str) -> AutomationResult<String>;
}

/// Configuration for [`OsascriptRunner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter to spawn. Defaults to "osascript".
    pub program: PathBuf,

    /// Arguments passed before the script is fed on stdin.
    pub args: Vec<String>,

    /// How long a script may run before the child is killed.
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("osascript"),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Runs scripts through `osascript`, one child process per script
///
/// The script text goes to the child's stdin, so nothing is interpolated into
/// a command line.
#[derive(Debug, Clone, Default)]
pub struct OsascriptRunner {
    config: RunnerConfig,
}

impl OsascriptRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ScriptRunner for OsascriptRunner {
    async fn run(&self, script: &str) -> AutomationResult<String> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AutomationError::RunnerNotFound(self.config.program.display().to_string())
            } else {
                AutomationError::Io(e)
            }
        })?;

        let stdin = child.stdin.take();
        let script = script.to_string();
        let exchange = async move {
            if let Some(mut stdin) = stdin {
                // A child that exits without reading its input closes the pipe early
                match stdin.write_all(script.as_bytes()).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(e),
                }
            }
            child.wait_with_output().await
        };

        // Dropping the exchange on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(timeout = ?self.config.timeout, "automation script timed out, child killed");
                return Err(AutomationError::Timeout(self.config.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(code = ?output.status.code(), stderr = %stderr.trim(), "automation script failed");
            return Err(AutomationError::from_script_failure(
                output.status.code(),
                &stderr,
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
