//! MCP server exposing the employee query tools and two read-only resources.

use crate::service::EmployeeQueries;
use crate::tools::{
    self, EmployeeStatsParams, GetEmployeeParams, ListEmployeesParams, SafeQueryParams,
    SearchEmployeesParams, ToolError, ToolResult,
};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourcesResult, PaginatedRequestParam,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};

pub const EMPLOYEES_URI: &str = "employees://employees";
pub const DEPARTMENTS_URI: &str = "employees://departments";

fn respond(result: ToolResult) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(ToolError::Arguments(e)) => Err(McpError::invalid_params(e.to_string(), None)),
        Err(e) => Err(McpError::internal_error(e.to_string(), None)),
    }
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

/// Employee database MCP Server
#[derive(Clone)]
pub struct EmployeesMcpServer {
    queries: EmployeeQueries,
    tool_router: ToolRouter<Self>,
}

impl EmployeesMcpServer {
    pub fn new(queries: EmployeeQueries) -> Self {
        Self {
            queries,
            tool_router: Self::tool_router(),
        }
    }

    pub fn resources() -> Vec<Resource> {
        vec![
            resource(
                EMPLOYEES_URI,
                "Employees Table",
                "Employee records with department information",
            ),
            resource(DEPARTMENTS_URI, "Departments Table", "Department information"),
        ]
    }

    /// JSON text of a resource, `None` for an unknown URI.
    pub async fn read(&self, uri: &str) -> Option<ToolResult> {
        let result = match uri {
            EMPLOYEES_URI => self.queries.all_employees().await,
            DEPARTMENTS_URI => {
                return Some(tools::list_departments(&self.queries).await);
            }
            _ => return None,
        };

        Some(
            result
                .map_err(ToolError::from)
                .and_then(|rows| serde_json::to_string_pretty(&rows).map_err(ToolError::Encode)),
        )
    }
}

#[tool_router]
impl EmployeesMcpServer {
    #[tool(description = "List all employees with their department information")]
    async fn list_employees(
        &self,
        Parameters(params): Parameters<ListEmployeesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::list_employees(&self.queries, params).await)
    }

    #[tool(description = "Get a specific employee by ID")]
    async fn get_employee(
        &self,
        Parameters(params): Parameters<GetEmployeeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::get_employee(&self.queries, params).await)
    }

    #[tool(description = "Search employees by name or department")]
    async fn search_employees(
        &self,
        Parameters(params): Parameters<SearchEmployeesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::search_employees(&self.queries, params).await)
    }

    #[tool(description = "List all departments")]
    async fn list_departments(&self) -> Result<CallToolResult, McpError> {
        respond(tools::list_departments(&self.queries).await)
    }

    #[tool(description = "Get statistics about employees (count, average salary, etc.)")]
    async fn get_employee_stats(
        &self,
        Parameters(params): Parameters<EmployeeStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::get_employee_stats(&self.queries, params).await)
    }

    #[tool(description = "Execute a safe SELECT query (read-only, no destructive operations)")]
    async fn safe_query(
        &self,
        Parameters(params): Parameters<SafeQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::safe_query(&self.queries, params).await)
    }
}

#[tool_handler]
impl ServerHandler for EmployeesMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Read-only access to the employee records database. \
                Use list_employees, get_employee and search_employees for employee rows, \
                list_departments and get_employee_stats for departments and salary figures, \
                and safe_query for any other single SELECT statement."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = match self.read(&request.uri).await {
            Some(result) => result.map_err(|e| McpError::internal_error(e.to_string(), None))?,
            None => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {}", request.uri),
                    None,
                ));
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
