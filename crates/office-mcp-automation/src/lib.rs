//! # office-mcp-automation
//!
//! Drives running Microsoft Office applications on macOS through AppleScript.
//!
//! # Architecture
//!
//! ```text
//! AutomationBridge
//!     └── Command  ──render──►  AppleScript text
//!           └── ScriptRunner (OsascriptRunner: one `osascript` child per script)
//!                 └── Apple events: PowerPoint / Word / Excel
//! ```
//!
//! Every failure (missing interpreter, denied permission, application not
//! running, script error, timeout) is an [`AutomationError`]; nothing is
//! retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use office_mcp_automation::{AutomationBridge, RunnerConfig};
//! use office_mcp_core::DocumentKind;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let bridge = AutomationBridge::osascript(RunnerConfig::default());
//! if bridge.is_running(DocumentKind::Document).await? {
//!     let doc = bridge.create(DocumentKind::Document, "Minutes").await?;
//!     println!("created {}", doc.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod command;
pub mod error;
pub mod runner;
pub mod script;

pub use bridge::{AppStatus, AutomationBridge};
pub use command::{save_formats, Command, LiveDocument};
pub use error::{AutomationError, AutomationResult};
pub use runner::{OsascriptRunner, RunnerConfig, ScriptRunner};
