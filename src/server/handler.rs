use std::sync::Arc;

use rmcp::{
    handler::server::{
        tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters, ServerHandler,
    },
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::config::AppState;

use super::logic;
use super::params::{
    FindDeclarationParams, GetDependenciesParams, GetHierarchyParams, GetScanReportParams,
    GetStatisticsParams, ListDeclarationsParams, RefreshIndexParams, SearchDeclarationsParams,
};

fn internal_error(e: anyhow::Error) -> ErrorData {
    ErrorData::internal_error(e.to_string(), None)
}

#[derive(Clone)]
pub struct TypedexServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TypedexServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List exported declarations, optionally filtered by module (case-insensitive) and kind (interface, type_alias, enum, function, class, variable, namespace, re_export)."
    )]
    async fn list_declarations(
        &self,
        params: Parameters<ListDeclarationsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::declarations::list_declarations(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Find a declaration by exact, case-sensitive name. Returns the full declaration, or an error with fuzzy suggestions."
    )]
    async fn find_declaration(
        &self,
        params: Parameters<FindDeclarationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::declarations::find_declaration(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Fuzzy search declarations by name, docs and signature. Results are ranked by score."
    )]
    async fn search_declarations(
        &self,
        params: Parameters<SearchDeclarationsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::declarations::search_declarations(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Get the inheritance hierarchy of a declaration: its extends/implements parents and the declarations that extend or implement it."
    )]
    async fn get_hierarchy(
        &self,
        params: Parameters<GetHierarchyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::analysis::get_hierarchy(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Get per-module exports and re-export sources. Pass a module to get a single entry."
    )]
    async fn get_dependencies(
        &self,
        params: Parameters<GetDependenciesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::analysis::get_dependencies(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Get library statistics: counts by kind and module, and the largest interfaces, types and functions."
    )]
    async fn get_statistics(
        &self,
        params: Parameters<GetStatisticsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::analysis::get_statistics(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(description = "Drop the cached index for the source root and rebuild it.")]
    async fn refresh_index(
        &self,
        params: Parameters<RefreshIndexParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::system::refresh_index(&self.state, params.0)
            .await
            .map_err(internal_error)
    }

    #[tool(
        description = "Get the scan report of the current index: files scanned and indexed, parse failures, timing and cache stats."
    )]
    async fn get_scan_report(
        &self,
        params: Parameters<GetScanReportParams>,
    ) -> Result<CallToolResult, ErrorData> {
        logic::system::get_scan_report(&self.state, params.0)
            .await
            .map_err(internal_error)
    }
}

impl ServerHandler for TypedexServer {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..ServerCapabilities::default()
            },
            server_info: Implementation {
                name: "typedex".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "TypeScript declaration index: list, find and fuzzy-search exported declarations, and inspect hierarchies, module dependencies and statistics."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let tool_context = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_context).await
    }
}
