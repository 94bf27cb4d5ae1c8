//! Operation dispatch
//!
//! Every operation goes through the same steps:
//!
//! 1. resolve the target session (`SessionNotFound`, `KindMismatch`)
//! 2. validate the parameters, reporting every bad field
//! 3. pick the backend: the session's own, or for creations the live
//!    application when it is enabled and running
//! 4. run the adapter under the session lock
//! 5. update the session metadata and build the response mapping

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use office_mcp_automation::{AutomationBridge, RunnerConfig};
use office_mcp_core::DocumentKind;
use office_mcp_ooxml::PackageProps;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::backend::{automation, library, AutomationAdapter};
use crate::config::ServerConfig;
use crate::error::{OfficeError, OfficeResult};
use crate::operation::{CreateRequest, Mutation, Operation};
use crate::params::{ListOpenWindowsParams, SaveParams};
use crate::registry::{Session, SessionRegistry};
use crate::session::{Backend, DocumentHandle, SessionMetadata};

/// The mapping returned for a successful operation
pub type Response = Map<String, Value>;

/// Routes operations to the registry and the backend adapters
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
    automation: Option<AutomationAdapter>,
    templates_dir: Option<PathBuf>,
}

impl Dispatcher {
    /// A dispatcher with the library backend only
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            automation: None,
            templates_dir: None,
        }
    }

    /// Build from configuration: `osascript` automation when enabled
    pub fn from_config(config: &ServerConfig, registry: Arc<SessionRegistry>) -> Self {
        let mut dispatcher = Self::new(registry);
        if config.automation.enabled {
            let runner = RunnerConfig {
                timeout: config.automation.timeout(),
                ..Default::default()
            };
            dispatcher = dispatcher.with_automation(AutomationBridge::osascript(runner));
        }
        if let Some(dir) = &config.templates_dir {
            dispatcher = dispatcher.with_templates_dir(dir.clone());
        }
        dispatcher
    }

    pub fn with_automation(mut self, bridge: AutomationBridge) -> Self {
        self.automation = Some(AutomationAdapter::new(bridge));
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn automation_enabled(&self) -> bool {
        self.automation.is_some()
    }

    /// Decode a raw request and run it
    pub async fn invoke_named(&self, name: &str, params: Value) -> OfficeResult<Response> {
        let operation = Operation::decode(name, params)?;
        self.invoke(operation).await
    }

    pub async fn invoke(&self, operation: Operation) -> OfficeResult<Response> {
        let name = operation.name();
        debug!(operation = name, id = operation.target(), "dispatching");

        let result = self.route(operation).await;
        match &result {
            Err(OfficeError::Internal(detail)) => {
                error!(operation = name, detail = %detail, "internal error")
            }
            Err(e) => debug!(operation = name, error = %e, "operation failed"),
            Ok(_) => {}
        }
        result
    }

    async fn route(&self, operation: Operation) -> OfficeResult<Response> {
        use DocumentKind::{Document, Presentation, Workbook};

        match operation {
            Operation::CreatePresentation(p) => self.create(p.validate()?).await,
            Operation::CreateDocument(p) => self.create(p.validate()?).await,
            Operation::CreateWorkbook(p) => self.create(p.validate()?).await,
            Operation::AddSlide(p) => self.mutate(&p.id, Presentation, || p.validate()).await,
            Operation::AddTextToSlide(p) => self.mutate(&p.id, Presentation, || p.validate()).await,
            Operation::AddImageToSlide(p) => {
                self.mutate(&p.id, Presentation, || p.validate()).await
            }
            Operation::AddSpeakerNotes(p) => {
                self.mutate(&p.id, Presentation, || p.validate()).await
            }
            Operation::AddHeading(p) => self.mutate(&p.id, Document, || p.validate()).await,
            Operation::AddParagraph(p) => self.mutate(&p.id, Document, || p.validate()).await,
            Operation::AddList(p) => self.mutate(&p.id, Document, || p.validate()).await,
            Operation::AddTable(p) => self.mutate(&p.id, Document, || p.validate()).await,
            Operation::AddWorksheet(p) => self.mutate(&p.id, Workbook, || p.validate()).await,
            Operation::WriteCell(p) => self.mutate(&p.id, Workbook, || p.validate()).await,
            Operation::WriteRange(p) => self.mutate(&p.id, Workbook, || p.validate()).await,
            Operation::AddFormula(p) => self.mutate(&p.id, Workbook, || p.validate()).await,
            Operation::CreateChart(p) => self.mutate(&p.id, Workbook, || p.validate()).await,
            Operation::Save(kind, p) => self.save(kind, &p).await,
            Operation::ListActive(kind) => Ok(self.list_active(kind).await),
            Operation::GetSessionInfo(p) => self.session_info(&p.id).await,
            Operation::CloseSession(p) => self.close(&p.id).await,
            Operation::ListWorksheets(p) => self.list_worksheets(&p.id).await,
            Operation::ListOpenWindows(p) => self.list_open_windows(&p).await,
            Operation::ListTemplates => self.list_templates(),
            Operation::ServerStatus => Ok(self.server_status().await),
            Operation::CheckOfficeStatus => Ok(self.office_status().await),
        }
    }

    fn automation(&self) -> OfficeResult<&AutomationAdapter> {
        self.automation
            .as_ref()
            .ok_or_else(|| OfficeError::AutomationUnavailable("automation is disabled".into()))
    }

    async fn resolve(&self, id: &str, kind: DocumentKind) -> OfficeResult<Session> {
        let session = self.registry.get(id).await?;
        if session.metadata.kind != kind {
            return Err(OfficeError::KindMismatch {
                id: id.to_string(),
                expected: kind,
                actual: session.metadata.kind,
            });
        }
        Ok(session)
    }

    async fn select_backend(&self, kind: DocumentKind) -> Backend {
        let Some(adapter) = &self.automation else {
            return Backend::Library;
        };
        if adapter.is_available(kind).await {
            Backend::Automation
        } else {
            debug!(kind = %kind, "application not available; using the library backend");
            Backend::Library
        }
    }

    async fn create(&self, request: CreateRequest) -> OfficeResult<Response> {
        let backend = self.select_backend(request.kind).await;
        let id = self.registry.create(request.kind, backend, &request.title).await;

        let built = match backend {
            Backend::Automation => match self.automation() {
                Ok(adapter) => adapter.create(&request).await.map(DocumentHandle::Live),
                Err(e) => Err(e),
            },
            Backend::Library => library::create(&request),
        };
        let handle = match built {
            Ok(handle) => handle,
            Err(e) => {
                self.registry.rollback(&id).await;
                return Err(e);
            }
        };

        debug_assert_eq!(handle.kind(), request.kind);
        debug_assert_eq!(handle.backend(), backend);
        let session = self.registry.complete(&id, handle).await?;
        let metadata = session.metadata;
        info!(id = %id, kind = %metadata.kind, backend = %backend, title = %metadata.title, "session created");

        Ok(success(json!({
            "id": metadata.id,
            "title": metadata.title,
            "created_at": metadata.created_at,
            "backend": metadata.backend,
            "kind": metadata.kind,
        })))
    }

    async fn mutate<F>(&self, id: &str, kind: DocumentKind, validate: F) -> OfficeResult<Response>
    where
        F: FnOnce() -> OfficeResult<Mutation>,
    {
        let session = self.resolve(id, kind).await?;
        let mutation = validate()?;
        let mut response = mutation.describe();

        let mut handle = session.handle.lock().await;
        debug_assert_eq!(handle.kind(), kind);
        let applied = match &mut *handle {
            DocumentHandle::Live(live) => self.automation()?.apply(live, mutation).await?,
            other => library::apply(other, mutation)?,
        };
        self.registry.mark_dirty(id).await?;
        drop(handle);

        response.extend(applied);
        response.insert("id".into(), json!(id));
        response.insert("status".into(), json!("success"));
        Ok(response)
    }

    async fn save(&self, kind: DocumentKind, params: &SaveParams) -> OfficeResult<Response> {
        let session = self.resolve(&params.id, kind).await?;
        let supported = match session.metadata.backend {
            Backend::Library => library::supported_formats(kind),
            Backend::Automation => automation::supported_formats(kind),
        };
        let target = params.validate(kind, supported)?;

        if let Some(parent) = target.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let handle = session.handle.lock().await;
        debug_assert_eq!(handle.backend(), session.metadata.backend);
        match &*handle {
            DocumentHandle::Live(live) => self.automation()?.save(live, &target).await?,
            other => library::save(other, &target, &package_props(&session.metadata)?)?,
        }
        self.registry.mark_saved(&params.id, &target.file_path).await?;
        drop(handle);

        info!(id = %params.id, path = %target.file_path, format = %target.format, "session saved");
        Ok(success(json!({
            "file_path": target.file_path,
            "format": target.format,
        })))
    }

    async fn list_active(&self, kind: DocumentKind) -> Response {
        let sessions = self.registry.list(Some(kind)).await;
        success(json!({
            "kind": kind,
            "count": sessions.len(),
            "sessions": sessions,
        }))
    }

    async fn session_info(&self, id: &str) -> OfficeResult<Response> {
        let session = self.registry.get(id).await?;
        let content = session.handle.lock().await.summary();
        // Read again: the metadata may have changed while we waited for the lock
        let metadata = self.registry.metadata(id).await?;

        let mut response = success(serde_json::to_value(metadata).map_err(|e| {
            OfficeError::internal(format!("session metadata did not serialize: {e}"))
        })?);
        response.insert("content".into(), content);
        Ok(response)
    }

    async fn close(&self, id: &str) -> OfficeResult<Response> {
        let session = self.registry.get(id).await?;
        // Wait for in-flight operations on this session
        let handle = session.handle.lock().await;
        let metadata = self.registry.remove(id).await?;
        drop(handle);

        info!(id = %id, kind = %metadata.kind, unsaved = metadata.dirty, "session closed");
        Ok(success(json!({
            "id": metadata.id,
            "kind": metadata.kind,
            "closed": true,
            "unsaved_changes": metadata.dirty,
        })))
    }

    async fn list_worksheets(&self, id: &str) -> OfficeResult<Response> {
        let session = self.resolve(id, DocumentKind::Workbook).await?;
        let sheets = match &*session.handle.lock().await {
            DocumentHandle::Workbook(workbook) => workbook.sheet_names(),
            DocumentHandle::Live(live) => live.sheets.clone(),
            _ => return Err(OfficeError::internal("workbook session without a workbook")),
        };
        Ok(success(json!({
            "id": id,
            "count": sheets.len(),
            "sheets": sheets,
        })))
    }

    async fn list_open_windows(&self, params: &ListOpenWindowsParams) -> OfficeResult<Response> {
        let kind: DocumentKind = params
            .kind
            .parse()
            .map_err(|e| OfficeError::invalid("kind", e))?;
        let documents = self.automation()?.list_open(kind).await?;
        let names: Vec<String> = documents.into_iter().map(|d| d.name).collect();
        Ok(success(json!({
            "kind": kind,
            "application": kind.application_name(),
            "documents": names,
        })))
    }

    fn list_templates(&self) -> OfficeResult<Response> {
        let Some(dir) = &self.templates_dir else {
            return Ok(success(json!({ "templates_dir": null, "templates": [] })));
        };

        let mut templates = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let kind = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(DocumentKind::from_extension);
            let (Some(kind), Some(name)) = (kind, path.file_stem().and_then(|s| s.to_str())) else {
                continue;
            };
            templates.push((name.to_string(), path.to_string_lossy().into_owned(), kind));
        }
        templates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let templates: Vec<Value> = templates
            .into_iter()
            .map(|(name, path, kind)| json!({ "name": name, "path": path, "type": kind }))
            .collect();
        Ok(success(json!({
            "templates_dir": dir.to_string_lossy(),
            "templates": templates,
        })))
    }

    async fn server_status(&self) -> Response {
        let mut counts = Map::new();
        let mut total = 0;
        for kind in DocumentKind::ALL {
            let count = self.registry.count(kind).await;
            total += count;
            counts.insert(kind.as_str().into(), json!(count));
        }
        success(json!({
            "server_version": env!("CARGO_PKG_VERSION"),
            "platform": std::env::consts::OS,
            "automation_enabled": self.automation_enabled(),
            "active_sessions": counts,
            "total_sessions": total,
        }))
    }

    async fn office_status(&self) -> Response {
        let mut response = success(json!({ "automation_enabled": self.automation_enabled() }));
        for kind in DocumentKind::ALL {
            let status = match &self.automation {
                Some(adapter) => adapter.status(kind).await,
                None => Default::default(),
            };
            response.insert(
                kind.as_str().into(),
                json!({
                    "application": kind.application_name(),
                    "available": self.automation.is_some() && status.running,
                    "running": status.running,
                    "version": status.version,
                }),
            );
        }
        response
    }
}

fn success(fields: Value) -> Response {
    let mut response = Map::new();
    response.insert("status".into(), json!("success"));
    if let Value::Object(fields) = fields {
        response.extend(fields);
    }
    response
}

/// Package properties stamped with the session's creation time, so saving
/// the same state twice writes the same bytes
fn package_props(metadata: &SessionMetadata) -> OfficeResult<PackageProps> {
    let created = DateTime::parse_from_rfc3339(&metadata.created_at)
        .map_err(|e| OfficeError::internal(format!("bad created_at on {}: {e}", metadata.id)))?
        .with_timezone(&Utc);
    Ok(PackageProps::new(metadata.title.clone(), created))
}
