//! End-to-end tests for office-mcp-server.
//!
//! Operations go through [`Dispatcher::invoke_named`] exactly as the MCP
//! tools send them. Live applications are replaced by a scripted runner.

mod automation;
mod common;
mod documents;
mod presentations;
mod sessions;
mod workbooks;

pub use common::*;
