//! End-to-end tests for office-mcp-ooxml.
//!
//! Each test builds a model in memory, writes it with one of the package
//! writers, then reads the bytes back (or inspects the zip) and asserts on
//! what survived.

mod common;
mod docx;
mod export;
mod pptx;
mod xlsx;

pub use common::*;
