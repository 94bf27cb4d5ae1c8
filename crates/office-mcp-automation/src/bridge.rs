//! The automation facade used by the server

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use office_mcp_core::{DocumentKind, SlideLayout};

use crate::command::{Command, LiveDocument};
use crate::error::{AutomationError, AutomationResult};
use crate::runner::{OsascriptRunner, RunnerConfig, ScriptRunner};
use crate::script::render;

/// What a status check found out about one application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppStatus {
    pub running: bool,
    pub version: Option<String>,
}

/// Sends [`Command`]s to live Office applications.
///
/// Cloning is cheap; clones share the runner.
#[derive(Clone)]
pub struct AutomationBridge {
    runner: Arc<dyn ScriptRunner>,
}

impl AutomationBridge {
    pub fn new(runner: Arc<dyn ScriptRunner>) -> Self {
        Self { runner }
    }

    /// A bridge that runs scripts through `osascript`
    pub fn osascript(config: RunnerConfig) -> Self {
        Self::new(Arc::new(OsascriptRunner::new(config)))
    }

    /// Render and run a command, returning the script's output
    pub async fn execute(&self, command: &Command) -> AutomationResult<String> {
        let script = render(command)?;
        debug!(command = command.name(), app = %command.kind(), "running automation script");
        self.runner.run(&script).await
    }

    /// Whether the application's process is running
    pub async fn is_running(&self, kind: DocumentKind) -> AutomationResult<bool> {
        let out = self.execute(&Command::IsRunning { kind }).await?;
        match out.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AutomationError::UnexpectedOutput(out)),
        }
    }

    pub async fn version(&self, kind: DocumentKind) -> AutomationResult<String> {
        self.execute(&Command::Version { kind }).await
    }

    /// Check an application; failures read as "not running"
    pub async fn status(&self, kind: DocumentKind) -> AppStatus {
        match self.is_running(kind).await {
            Ok(true) => AppStatus {
                running: true,
                version: self.version(kind).await.ok().filter(|v| !v.is_empty()),
            },
            Ok(false) => AppStatus::default(),
            Err(e) => {
                debug!(app = %kind, error = %e, "application status check failed");
                AppStatus::default()
            }
        }
    }

    /// Documents currently open in the application
    pub async fn list_open(&self, kind: DocumentKind) -> AutomationResult<Vec<LiveDocument>> {
        let out = self.execute(&Command::ListOpen { kind }).await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| LiveDocument {
                kind,
                name: name.to_string(),
            })
            .collect())
    }

    /// Create a new document in the application
    pub async fn create(&self, kind: DocumentKind, title: &str) -> AutomationResult<LiveDocument> {
        let out = self
            .execute(&Command::Create {
                kind,
                title: title.to_string(),
            })
            .await?;
        live_document(kind, out)
    }

    /// Open a file in the application
    pub async fn open(&self, kind: DocumentKind, path: &Path) -> AutomationResult<LiveDocument> {
        let out = self
            .execute(&Command::Open {
                kind,
                path: path.to_path_buf(),
            })
            .await?;
        live_document(kind, out)
    }

    /// Number of slides in an open presentation
    pub async fn slide_count(&self, presentation: &str) -> AutomationResult<usize> {
        let out = self
            .execute(&Command::CountSlides {
                presentation: presentation.to_string(),
            })
            .await?;
        out.parse::<usize>()
            .map_err(|_| AutomationError::UnexpectedOutput(out))
    }

    /// Sheet names of an open workbook, in order
    pub async fn worksheet_names(&self, workbook: &str) -> AutomationResult<Vec<String>> {
        let out = self
            .execute(&Command::ListWorksheets {
                workbook: workbook.to_string(),
            })
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Add a slide; returns its 1-based index
    pub async fn add_slide(
        &self,
        presentation: &str,
        layout: SlideLayout,
        position: Option<usize>,
    ) -> AutomationResult<usize> {
        let out = self
            .execute(&Command::AddSlide {
                presentation: presentation.to_string(),
                layout,
                position,
            })
            .await?;
        parse_index(out)
    }

    /// Add a worksheet; returns its 1-based index
    pub async fn add_worksheet(
        &self,
        workbook: &str,
        name: &str,
        position: Option<usize>,
    ) -> AutomationResult<usize> {
        let out = self
            .execute(&Command::AddWorksheet {
                workbook: workbook.to_string(),
                name: name.to_string(),
                position,
            })
            .await?;
        parse_index(out)
    }
}

impl std::fmt::Debug for AutomationBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationBridge").finish_non_exhaustive()
    }
}

fn live_document(kind: DocumentKind, name: String) -> AutomationResult<LiveDocument> {
    if name.is_empty() {
        return Err(AutomationError::UnexpectedOutput(
            "application returned no document name".into(),
        ));
    }
    Ok(LiveDocument { kind, name })
}

fn parse_index(out: String) -> AutomationResult<usize> {
    out.parse::<usize>()
        .ok()
        .filter(|i| *i >= 1)
        .ok_or(AutomationError::UnexpectedOutput(out))
}
