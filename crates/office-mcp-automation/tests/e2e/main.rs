//! End-to-end tests for office-mcp-automation.
//!
//! The bridge is driven through a scripted [`ScriptRunner`] that records every
//! script and replays canned output, so no Office installation is needed.

mod bridge;
mod common;

pub use common::*;
