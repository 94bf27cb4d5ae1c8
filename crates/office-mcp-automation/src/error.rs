//! Error types for office-mcp-automation

use std::time::Duration;

use thiserror::Error;

/// Result type alias using [`AutomationError`]
pub type AutomationResult<T> = std::result::Result<T, AutomationError>;

/// Errors raised while driving a live application
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The script interpreter could not be started
    #[error("Script runner not found: {0}")]
    RunnerNotFound(String),

    /// The OS refused to let us send Apple events
    #[error("Automation permission denied: {0}")]
    PermissionDenied(String),

    /// The target application is not running or not installed
    #[error("Application not available: {0}")]
    ApplicationUnavailable(String),

    /// The script ran and reported an error
    #[error("Script failed (exit code {code:?}): {message}")]
    ScriptFailed { code: Option<i32>, message: String },

    /// The script did not finish in time and was killed
    #[error("Script timed out after {0:?}")]
    Timeout(Duration),

    /// The script succeeded but printed something we cannot use
    #[error("Unexpected script output: {0}")]
    UnexpectedOutput(String),

    /// The live application cannot do what was asked
    #[error("Not supported by the application: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutomationError {
    /// Classify a failed `osascript` run from its exit code and stderr
    ///
    /// AppleScript reports errors as `execution error: <text> (<number>)`;
    /// -1743 is a privacy (TCC) denial, -600 and -10814 mean the application
    /// is not running or not installed.
    pub fn from_script_failure(code: Option<i32>, stderr: &str) -> Self {
        let message = stderr.trim().to_string();
        if message.contains("(-1743)") || message.contains("Not authorized to send Apple events") {
            AutomationError::PermissionDenied(message)
        } else if message.contains("(-600)")
            || message.contains("(-10814)")
            || message.contains("isn’t running")
            || message.contains("isn't running")
            || message.contains("Can’t get application")
        {
            AutomationError::ApplicationUnavailable(message)
        } else {
            AutomationError::ScriptFailed { code, message }
        }
    }
}
