//! MCP tool surface
//!
//! Each tool decodes into an [`Operation`] and hands it to the shared
//! [`Dispatcher`]; failures become `ErrorData` carrying `{kind, message}`.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use office_mcp_core::DocumentKind;

use crate::dispatch::{Dispatcher, Response};
use crate::operation::Operation;
use crate::params::*;

type ToolResult = Result<Json<Response>, ErrorData>;

#[derive(Clone)]
pub struct OfficeMcp {
    dispatcher: Arc<Dispatcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl OfficeMcp {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    async fn run(&self, operation: Operation) -> ToolResult {
        self.dispatcher
            .invoke(operation)
            .await
            .map(Json)
            .map_err(ErrorData::from)
    }

    /// Create a presentation with a title slide; returns the session id used by
    /// the other presentation tools.
    #[tool(name = "create_presentation")]
    async fn create_presentation(
        &self,
        Parameters(params): Parameters<CreatePresentationParams>,
    ) -> ToolResult {
        self.run(Operation::CreatePresentation(params)).await
    }

    /// Create a word-processing document; a title other than "New Document"
    /// becomes its first heading.
    #[tool(name = "create_document")]
    async fn create_document(&self, Parameters(params): Parameters<CreateDocumentParams>) -> ToolResult {
        self.run(Operation::CreateDocument(params)).await
    }

    /// Create a workbook with one sheet, Sheet1, whose A1 holds the title.
    #[tool(name = "create_workbook")]
    async fn create_workbook(&self, Parameters(params): Parameters<CreateWorkbookParams>) -> ToolResult {
        self.run(Operation::CreateWorkbook(params)).await
    }

    /// Add a slide with a standard layout; returns its slide_id.
    #[tool(name = "add_slide")]
    async fn add_slide(&self, Parameters(params): Parameters<AddSlideParams>) -> ToolResult {
        self.run(Operation::AddSlide(params)).await
    }

    /// Append a paragraph of text to a slide placeholder.
    #[tool(name = "add_text_to_slide")]
    async fn add_text_to_slide(&self, Parameters(params): Parameters<AddTextToSlideParams>) -> ToolResult {
        self.run(Operation::AddTextToSlide(params)).await
    }

    /// Place a local PNG, JPEG or GIF image on a slide.
    #[tool(name = "add_image_to_slide")]
    async fn add_image_to_slide(
        &self,
        Parameters(params): Parameters<AddImageToSlideParams>,
    ) -> ToolResult {
        self.run(Operation::AddImageToSlide(params)).await
    }

    /// Append speaker notes to a slide.
    #[tool(name = "add_speaker_notes")]
    async fn add_speaker_notes(&self, Parameters(params): Parameters<AddSpeakerNotesParams>) -> ToolResult {
        self.run(Operation::AddSpeakerNotes(params)).await
    }

    /// Append a heading (level 1 to 6) to a document.
    #[tool(name = "add_heading")]
    async fn add_heading(&self, Parameters(params): Parameters<AddHeadingParams>) -> ToolResult {
        self.run(Operation::AddHeading(params)).await
    }

    /// Append a body paragraph to a document.
    #[tool(name = "add_paragraph")]
    async fn add_paragraph(&self, Parameters(params): Parameters<AddParagraphParams>) -> ToolResult {
        self.run(Operation::AddParagraph(params)).await
    }

    /// Append a bulleted or numbered list to a document.
    #[tool(name = "add_list")]
    async fn add_list(&self, Parameters(params): Parameters<AddListParams>) -> ToolResult {
        self.run(Operation::AddList(params)).await
    }

    /// Append a table to a document, optionally filled from `data`.
    #[tool(name = "add_table")]
    async fn add_table(&self, Parameters(params): Parameters<AddTableParams>) -> ToolResult {
        self.run(Operation::AddTable(params)).await
    }

    /// Add a worksheet to a workbook.
    #[tool(name = "add_worksheet")]
    async fn add_worksheet(&self, Parameters(params): Parameters<AddWorksheetParams>) -> ToolResult {
        self.run(Operation::AddWorksheet(params)).await
    }

    /// Write one value into a cell.
    #[tool(name = "write_cell")]
    async fn write_cell(&self, Parameters(params): Parameters<WriteCellParams>) -> ToolResult {
        self.run(Operation::WriteCell(params)).await
    }

    /// Write rows of values starting at a cell.
    #[tool(name = "write_range")]
    async fn write_range(&self, Parameters(params): Parameters<WriteRangeParams>) -> ToolResult {
        self.run(Operation::WriteRange(params)).await
    }

    /// Put a formula in a cell; it is computed by whatever opens the file.
    #[tool(name = "add_formula")]
    async fn add_formula(&self, Parameters(params): Parameters<AddFormulaParams>) -> ToolResult {
        self.run(Operation::AddFormula(params)).await
    }

    /// Chart a block of cells on the same sheet.
    #[tool(name = "create_chart")]
    async fn create_chart(&self, Parameters(params): Parameters<CreateChartParams>) -> ToolResult {
        self.run(Operation::CreateChart(params)).await
    }

    /// Save a presentation (library sessions write pptx).
    #[tool(name = "save_presentation")]
    async fn save_presentation(&self, Parameters(params): Parameters<SaveParams>) -> ToolResult {
        self.run(Operation::Save(DocumentKind::Presentation, params)).await
    }

    /// Save a document (library sessions write docx or txt).
    #[tool(name = "save_document")]
    async fn save_document(&self, Parameters(params): Parameters<SaveParams>) -> ToolResult {
        self.run(Operation::Save(DocumentKind::Document, params)).await
    }

    /// Save a workbook (library sessions write xlsx or csv).
    #[tool(name = "save_workbook")]
    async fn save_workbook(&self, Parameters(params): Parameters<SaveParams>) -> ToolResult {
        self.run(Operation::Save(DocumentKind::Workbook, params)).await
    }

    /// Open presentation sessions, oldest first.
    #[tool(name = "list_active_presentations")]
    async fn list_active_presentations(&self) -> ToolResult {
        self.run(Operation::ListActive(DocumentKind::Presentation)).await
    }

    /// Open document sessions, oldest first.
    #[tool(name = "list_active_documents")]
    async fn list_active_documents(&self) -> ToolResult {
        self.run(Operation::ListActive(DocumentKind::Document)).await
    }

    /// Open workbook sessions, oldest first.
    #[tool(name = "list_active_workbooks")]
    async fn list_active_workbooks(&self) -> ToolResult {
        self.run(Operation::ListActive(DocumentKind::Workbook)).await
    }

    /// Metadata and content counts of one session.
    #[tool(name = "get_session_info")]
    async fn get_session_info(&self, Parameters(params): Parameters<SessionParams>) -> ToolResult {
        self.run(Operation::GetSessionInfo(params)).await
    }

    /// Forget a session. Unsaved changes are discarded.
    #[tool(name = "close_session")]
    async fn close_session(&self, Parameters(params): Parameters<SessionParams>) -> ToolResult {
        self.run(Operation::CloseSession(params)).await
    }

    /// Sheet names of a workbook, in order.
    #[tool(name = "list_worksheets")]
    async fn list_worksheets(&self, Parameters(params): Parameters<SessionParams>) -> ToolResult {
        self.run(Operation::ListWorksheets(params)).await
    }

    /// Documents open in the running Office application of a kind.
    #[tool(name = "list_open_windows")]
    async fn list_open_windows(
        &self,
        Parameters(params): Parameters<ListOpenWindowsParams>,
    ) -> ToolResult {
        self.run(Operation::ListOpenWindows(params)).await
    }

    /// Template files found in the configured templates directory.
    #[tool(name = "list_templates")]
    async fn list_templates(&self) -> ToolResult {
        self.run(Operation::ListTemplates).await
    }

    /// Session counts, server version and platform.
    #[tool(name = "server_status")]
    async fn server_status(&self) -> ToolResult {
        self.run(Operation::ServerStatus).await
    }

    /// Whether PowerPoint, Word and Excel are running and reachable.
    #[tool(name = "check_office_status")]
    async fn check_office_status(&self) -> ToolResult {
        self.run(Operation::CheckOfficeStatus).await
    }
}

#[tool_handler]
impl ServerHandler for OfficeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Office document server. Create a session with create_presentation, \
                 create_document or create_workbook, pass the returned id to the content \
                 tools, then save with save_presentation, save_document or save_workbook."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SessionRegistry;
    use pretty_assertions::assert_eq;
    use rmcp::model::ErrorCode;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn server() -> OfficeMcp {
        OfficeMcp::new(Arc::new(Dispatcher::new(Arc::new(SessionRegistry::new()))))
    }

    #[test]
    fn test_tools_match_operations() {
        let tools = OfficeMcp::tool_router().list_all();
        let names: BTreeSet<String> = tools.iter().map(|t| t.name.to_string()).collect();
        let expected: BTreeSet<String> = Operation::NAMES.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, expected);

        for tool in &tools {
            let described = tool
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty());
            assert!(described, "{} has no description", tool.name);
            assert_eq!(
                tool.input_schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "{}",
                tool.name
            );
        }
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let server = server();
        let Json(created) = server
            .create_document(Parameters(CreateDocumentParams {
                title: Some("Report".into()),
                template_path: None,
            }))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let Json(added) = server
            .add_heading(Parameters(AddHeadingParams {
                id: id.clone(),
                text: "Intro".into(),
                level: Some(2),
                style: None,
            }))
            .await
            .unwrap();
        assert_eq!(added["status"], json!("success"));
        assert_eq!(added["level"], json!(2));

        let Json(listed) = server.list_active_documents().await.unwrap();
        assert_eq!(listed["count"], json!(1));
    }

    #[tokio::test]
    async fn test_errors_carry_kind() {
        let err = server()
            .get_session_info(Parameters(SessionParams { id: "nope".into() }))
            .await
            .err().unwrap();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(err.data.unwrap()["kind"], json!("SessionNotFound"));
    }
}
