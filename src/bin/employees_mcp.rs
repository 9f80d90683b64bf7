//! Employee database MCP server over stdio.
//!
//! Configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "employees": { "command": "./employees-mcp" } } }
//! ```

use anyhow::Context;
use employee_records::config::Config;
use employee_records::mcp::EmployeesMcpServer;
use employee_records::service::EmployeeQueries;
use employee_records::telemetry;
use rmcp::ServiceExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_stderr_logging("employees_mcp")?;
    let config = Config::from_env()?;

    tracing::info!(database_url = %config.database_url, "Starting employees MCP server");

    let queries = EmployeeQueries::from_url(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL {}", config.database_url))?;

    let service = EmployeesMcpServer::new(queries)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    Ok(())
}
