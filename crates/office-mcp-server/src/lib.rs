//! # office-mcp-server
//!
//! MCP server for creating and editing Office documents.
//!
//! A client opens a *session* per document with one of the create tools and
//! refers to it by id afterwards. Each session is bound for life to one
//! backend: the in-process library backend, or a live Office application
//! driven through AppleScript when one is running.
//!
//! ```text
//! OfficeMcp (rmcp tools)
//!     └── Dispatcher ── SessionRegistry
//!           ├── backend::library     (core models + OOXML writers)
//!           └── backend::automation  (AutomationBridge → osascript)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use office_mcp_server::{Dispatcher, SessionRegistry};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = Dispatcher::new(Arc::new(SessionRegistry::new()));
//! let created = dispatcher
//!     .invoke_named("create_workbook", json!({"title": "Budget"}))
//!     .await
//!     .unwrap();
//! assert_eq!(created["backend"], json!("library"));
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod operation;
pub mod params;
pub mod registry;
pub mod session;

pub use config::{LogFormat, ServerConfig};
pub use dispatch::{Dispatcher, Response};
pub use error::{ErrorKind, OfficeError, OfficeResult};
pub use mcp::OfficeMcp;
pub use operation::Operation;
pub use registry::{Session, SessionRegistry};
pub use session::{Backend, DocumentHandle, SessionMetadata};
