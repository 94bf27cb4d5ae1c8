//! Common utilities for E2E tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use office_mcp_automation::{AutomationBridge, AutomationError, AutomationResult, ScriptRunner};
use office_mcp_server::{Dispatcher, ErrorKind, OfficeResult, Response, SessionRegistry};
use serde_json::Value;

/// A dispatcher with the library backend only
pub fn library_dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(SessionRegistry::new()))
}

/// Run an operation that must succeed
pub async fn call(dispatcher: &Dispatcher, name: &str, params: Value) -> Response {
    match dispatcher.invoke_named(name, params).await {
        Ok(response) => response,
        Err(e) => panic!("{name} failed: {e}"),
    }
}

/// Run an operation that must fail, returning the error kind
pub async fn fail(dispatcher: &Dispatcher, name: &str, params: Value) -> ErrorKind {
    let result: OfficeResult<Response> = dispatcher.invoke_named(name, params).await;
    match result {
        Ok(response) => panic!("{name} unexpectedly succeeded: {response:?}"),
        Err(e) => e.kind(),
    }
}

/// Create a session and return its id
pub async fn create(dispatcher: &Dispatcher, name: &str, params: Value) -> String {
    let response = call(dispatcher, name, params).await;
    response["id"].as_str().unwrap().to_string()
}

/// A 1x1 transparent PNG
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// One canned reply
pub enum Reply {
    Output(&'static str),
    Fail(&'static str),
}

/// Replays replies in order and records the scripts it was given
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    scripts: Mutex<Vec<String>>,
    /// How long each script takes
    delay: Duration,
    /// Start and end of each script, in completion order
    spans: Mutex<Vec<(Instant, Instant)>>,
}

impl ScriptedRunner {
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn spans(&self) -> Vec<(Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptRunner for ScriptedRunner {
    async fn run(&self, script: &str) -> AutomationResult<String> {
        let started = Instant::now();
        self.scripts.lock().unwrap().push(script.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.spans.lock().unwrap().push((started, Instant::now()));
        match reply {
            Some(Reply::Output(out)) => Ok(out.to_string()),
            Some(Reply::Fail(stderr)) => Err(AutomationError::from_script_failure(Some(1), stderr)),
            None => Err(AutomationError::ScriptFailed {
                code: None,
                message: "no scripted reply left".into(),
            }),
        }
    }
}

/// A dispatcher whose live applications answer from a script
pub fn automation_dispatcher(replies: Vec<Reply>) -> (Dispatcher, Arc<ScriptedRunner>) {
    slow_automation_dispatcher(replies, Duration::ZERO)
}

/// Like [`automation_dispatcher`], with every script taking `delay`
pub fn slow_automation_dispatcher(
    replies: Vec<Reply>,
    delay: Duration,
) -> (Dispatcher, Arc<ScriptedRunner>) {
    let runner = Arc::new(ScriptedRunner {
        replies: Mutex::new(replies.into()),
        delay,
        ..Default::default()
    });
    let dispatcher = library_dispatcher().with_automation(AutomationBridge::new(runner.clone()));
    (dispatcher, runner)
}
