//! The six query-tool operations, rendered as the text an agent receives.
//!
//! Both the MCP server and the direct interface call these functions, so the
//! argument shapes and the textual results cannot drift apart.

use crate::service::{EmployeeQueries, QueryError};
use derive_more::Display;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    ListEmployees,
    GetEmployee,
    SearchEmployees,
    ListDepartments,
    GetEmployeeStats,
    SafeQuery,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListEmployeesParams {
    /// Maximum number of employees to return (default: 100)
    #[schemars(range(min = 1, max = 1000))]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEmployeeParams {
    /// The ID of the employee to retrieve
    pub employee_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchEmployeesParams {
    /// Search by employee name (partial match)
    pub name: Option<String>,
    /// Search by department name
    pub department: Option<String>,
    /// Maximum number of results (default: 50)
    #[schemars(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmployeeStatsParams {
    /// Filter by department ID (optional)
    pub department_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SafeQueryParams {
    /// SQL SELECT query to execute
    pub query: String,
}

#[derive(Debug, Display)]
pub enum ToolError {
    #[display(fmt = "invalid arguments: {}", _0)]
    Arguments(serde_json::Error),
    #[display(fmt = "{}", _0)]
    Query(QueryError),
    #[display(fmt = "failed to encode result: {}", _0)]
    Encode(serde_json::Error),
}

impl std::error::Error for ToolError {}

impl From<QueryError> for ToolError {
    fn from(err: QueryError) -> Self {
        ToolError::Query(err)
    }
}

pub type ToolResult = Result<String, ToolError>;

fn to_json<T: Serialize>(value: &T) -> ToolResult {
    serde_json::to_string_pretty(value).map_err(ToolError::Encode)
}

pub async fn list_employees(queries: &EmployeeQueries, params: ListEmployeesParams) -> ToolResult {
    to_json(&queries.list_employees(params.limit).await?)
}

pub async fn get_employee(queries: &EmployeeQueries, params: GetEmployeeParams) -> ToolResult {
    match queries.get_employee(params.employee_id).await? {
        Some(record) => to_json(&record),
        None => Ok(EMPLOYEE_NOT_FOUND.to_string()),
    }
}

pub async fn search_employees(queries: &EmployeeQueries, params: SearchEmployeesParams) -> ToolResult {
    let rows = queries
        .search_employees(
            params.name.as_deref(),
            params.department.as_deref(),
            params.limit,
        )
        .await?;
    to_json(&rows)
}

pub async fn list_departments(queries: &EmployeeQueries) -> ToolResult {
    to_json(&queries.list_departments().await?)
}

pub async fn get_employee_stats(queries: &EmployeeQueries, params: EmployeeStatsParams) -> ToolResult {
    to_json(&queries.employee_stats(params.department_id).await?)
}

/// Rejections and engine errors come back as text, not as a tool failure.
pub async fn safe_query(queries: &EmployeeQueries, params: SafeQueryParams) -> ToolResult {
    match queries.safe_query(&params.query).await {
        Ok(rows) => to_json(&rows),
        Err(e @ QueryError::Unsafe) => Ok(format!("Error: {e}")),
        Err(e @ (QueryError::Sql(_) | QueryError::MultipleStatements)) => Ok(e.to_string()),
    }
}
