//! Common utilities for E2E tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use office_mcp_automation::{AutomationBridge, AutomationError, AutomationResult, ScriptRunner};

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
}

impl ScriptedRunner {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            scripts: Mutex::new(Vec::new()),
        })
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptRunner for ScriptedRunner {
    async fn run(&self, script: &str) -> AutomationResult<String> {
        self.scripts.lock().unwrap().push(script.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Output(out)) => Ok(out.to_string()),
            Some(Reply::Fail(stderr)) => Err(AutomationError::from_script_failure(Some(1), stderr)),
            None => Err(AutomationError::ScriptFailed {
                code: None,
                message: "no scripted reply left".into(),
            }),
        }
    }
}

/// A bridge over a scripted runner, plus the runner for inspection
pub fn scripted_bridge(replies: Vec<Reply>) -> (AutomationBridge, Arc<ScriptedRunner>) {
    let runner = ScriptedRunner::new(replies);
    (AutomationBridge::new(runner.clone()), runner)
}
