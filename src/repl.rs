//! Line-oriented command loop over the direct interface.

use crate::direct::DirectInterface;
use crate::tools::{
    EmployeeStatsParams, GetEmployeeParams, ListEmployeesParams, Operation, SafeQueryParams,
    SearchEmployeesParams,
};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const MENU: &str = "\
Employee Database Interface
Available commands:
1. list_employees [limit]
2. get_employee <id>
3. search_employees [name] [department] [limit]
4. list_departments
5. get_employee_stats [department_id]
6. safe_query <sql>
7. quit
";

const PROMPT: &[u8] = b"\nEnter command: ";

/// Reads commands until `quit` or end of input, writing each result to `writer`.
pub async fn run<R, W>(direct: &DirectInterface, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(MENU.as_bytes()).await?;

    let mut lines = reader.lines();
    loop {
        writer.write_all(PROMPT).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };

        let command = command.to_lowercase();
        if command == "quit" {
            break;
        }

        let output = execute(direct, &command, args).await;
        writer.write_all(output.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await
}

/// Runs one already-split command line and returns what should be printed.
pub async fn execute(direct: &DirectInterface, command: &str, args: &[&str]) -> String {
    let Ok(operation) = command.parse::<Operation>() else {
        return "Unknown command".to_string();
    };

    match command_arguments(operation, args) {
        Ok(arguments) => direct.call(operation, arguments).await,
        Err(message) => message,
    }
}

/// Positional words → the JSON arguments of the tool. `Err` carries the text to print.
fn command_arguments(operation: Operation, args: &[&str]) -> Result<Value, String> {
    match operation {
        Operation::ListEmployees => to_value(ListEmployeesParams {
            limit: int_arg(args.first())?,
        }),
        Operation::GetEmployee => {
            let Some(raw) = args.first() else {
                return Err("Usage: get_employee <id>".to_string());
            };
            to_value(GetEmployeeParams {
                employee_id: parse_int(raw)?,
            })
        }
        Operation::SearchEmployees => to_value(SearchEmployeesParams {
            name: args.first().map(|s| s.to_string()),
            department: args.get(1).map(|s| s.to_string()),
            limit: int_arg(args.get(2))?,
        }),
        Operation::ListDepartments => Ok(Value::Object(Default::default())),
        Operation::GetEmployeeStats => to_value(EmployeeStatsParams {
            department_id: int_arg(args.first())?,
        }),
        Operation::SafeQuery => {
            if args.is_empty() {
                return Err("Usage: safe_query <sql>".to_string());
            }
            to_value(SafeQueryParams {
                query: args.join(" "),
            })
        }
    }
}

fn to_value<T: Serialize>(params: T) -> Result<Value, String> {
    serde_json::to_value(params).map_err(|e| format!("Error: {e}"))
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("Error: invalid integer {raw:?}"))
}

fn int_arg(raw: Option<&&str>) -> Result<Option<i64>, String> {
    raw.map(|s| parse_int(s)).transpose()
}
