//! Backend adapters
//!
//! [`library`] builds documents in process and saves them through the OOXML
//! writers. [`automation`] drives the live Office applications. Both accept
//! the same validated [`crate::operation::Mutation`]s.

pub mod automation;
pub mod library;

pub use automation::AutomationAdapter;

use serde_json::{Map, Value};

/// Confirmation fields an adapter reports for one change
pub type Summary = Map<String, Value>;

pub(crate) fn summary(value: Value) -> Summary {
    match value {
        Value::Object(map) => map,
        _ => Summary::new(),
    }
}
