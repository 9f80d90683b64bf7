//! In-process access to the query tools, without an MCP transport.

use crate::service::EmployeeQueries;
use crate::tools::{self, Operation, ToolError, ToolResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct DirectInterface {
    queries: EmployeeQueries,
}

fn arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    // a missing argument object means "no arguments"
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(ToolError::Arguments)
}

impl DirectInterface {
    pub fn new(queries: EmployeeQueries) -> Self {
        Self { queries }
    }

    pub fn tool_names() -> Vec<&'static str> {
        Operation::iter().map(Into::into).collect()
    }

    /// Calls a tool by name. Unknown names and failures come back as text.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> String {
        match name.parse::<Operation>() {
            Ok(operation) => self.call(operation, arguments).await,
            Err(_) => format!("Unknown tool: {name}"),
        }
    }

    pub async fn call(&self, operation: Operation, arguments: Value) -> String {
        debug!(%operation, %arguments, "Direct tool call");
        match self.dispatch(operation, arguments).await {
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        }
    }

    async fn dispatch(&self, operation: Operation, args: Value) -> ToolResult {
        let queries = &self.queries;
        match operation {
            Operation::ListEmployees => tools::list_employees(queries, arguments(args)?).await,
            Operation::GetEmployee => tools::get_employee(queries, arguments(args)?).await,
            Operation::SearchEmployees => tools::search_employees(queries, arguments(args)?).await,
            Operation::ListDepartments => tools::list_departments(queries).await,
            Operation::GetEmployeeStats => tools::get_employee_stats(queries, arguments(args)?).await,
            Operation::SafeQuery => tools::safe_query(queries, arguments(args)?).await,
        }
    }
}
