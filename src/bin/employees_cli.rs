//! Interactive command loop over the employee query tools.

use anyhow::Context;
use employee_records::config::Config;
use employee_records::direct::DirectInterface;
use employee_records::service::EmployeeQueries;
use employee_records::{repl, telemetry};
use tokio::io::{BufReader, stdin, stdout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_stderr_logging("employees_cli")?;
    let config = Config::from_env()?;

    let queries = EmployeeQueries::from_url(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL {}", config.database_url))?;
    let direct = DirectInterface::new(queries);

    repl::run(&direct, BufReader::new(stdin()), stdout()).await?;

    Ok(())
}
