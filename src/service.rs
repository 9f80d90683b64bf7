//! Read-only query operations offered to external agents.
//!
//! Every call opens its own connection from the injected options and closes it
//! before returning, so the tool process never holds the database open between
//! requests. The MCP server, the direct interface and the command loop all go
//! through [`EmployeeQueries`].

use crate::{
    db,
    model::{Department, EmployeeRecord, EmployeeStats},
    repository::{department, employee},
    safety,
};
use derive_more::Display;
use serde_json::{Map, Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Column, Connection, Row, SqliteConnection, TypeInfo, ValueRef};
use tracing::{debug, warn};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;
pub const MAX_SEARCH_LIMIT: i64 = 500;

/// Rows returned by [`EmployeeQueries::safe_query`], one column-name → value map per row.
pub type QueryRows = Vec<Map<String, Value>>;

#[derive(Debug, Display)]
pub enum QueryError {
    #[display(fmt = "Query contains unsafe operations. Only SELECT statements are allowed.")]
    Unsafe,
    #[display(fmt = "SQL Error: You can only execute one statement at a time.")]
    MultipleStatements,
    #[display(fmt = "SQL Error: {}", _0)]
    Sql(sqlx::Error),
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Unsafe | QueryError::MultipleStatements => None,
            QueryError::Sql(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::Sql(err)
    }
}

#[derive(Clone, Debug)]
pub struct EmployeeQueries {
    options: SqliteConnectOptions,
}

impl EmployeeQueries {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_url(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self::new(db::connect_options(database_url)?))
    }

    async fn connect(&self) -> Result<SqliteConnection, sqlx::Error> {
        SqliteConnection::connect_with(&self.options).await
    }

    pub async fn list_employees(&self, limit: Option<i64>) -> Result<Vec<EmployeeRecord>, QueryError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

        let mut conn = self.connect().await?;
        let rows = employee::find_page(&mut conn, limit).await;
        close(conn).await;

        Ok(rows?)
    }

    /// Every employee, unpaged. Backs the employees resource.
    pub async fn all_employees(&self) -> Result<Vec<EmployeeRecord>, QueryError> {
        let mut conn = self.connect().await?;
        let rows = employee::find_all(&mut conn).await;
        close(conn).await;

        Ok(rows?)
    }

    pub async fn get_employee(&self, employee_id: i64) -> Result<Option<EmployeeRecord>, QueryError> {
        let mut conn = self.connect().await?;
        let row = employee::find_by_id(&mut conn, employee_id).await;
        close(conn).await;

        Ok(row?)
    }

    pub async fn search_employees(
        &self,
        name: Option<&str>,
        department: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<EmployeeRecord>, QueryError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);

        let mut conn = self.connect().await?;
        let rows = employee::search(
            &mut conn,
            name.unwrap_or_default(),
            department.unwrap_or_default(),
            limit,
        )
        .await;
        close(conn).await;

        Ok(rows?)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, QueryError> {
        let mut conn = self.connect().await?;
        let rows = department::find_all(&mut conn).await;
        close(conn).await;

        Ok(rows?)
    }

    /// Company-wide figures, or one department's. A department id of 0 means
    /// no filter.
    pub async fn employee_stats(&self, department_id: Option<i64>) -> Result<EmployeeStats, QueryError> {
        let department_id = department_id.filter(|&id| id != 0);

        let mut conn = self.connect().await?;
        let stats = employee::stats(&mut conn, department_id).await;
        close(conn).await;

        Ok(stats?)
    }

    /// Runs caller-supplied SQL that passed [`safety::is_safe_query`], on a
    /// read-only connection.
    pub async fn safe_query(&self, sql: &str) -> Result<QueryRows, QueryError> {
        if !safety::is_safe_query(sql) {
            debug!(sql, "Rejected unsafe query");
            return Err(QueryError::Unsafe);
        }
        if !safety::is_single_statement(sql) {
            debug!(sql, "Rejected multi-statement query");
            return Err(QueryError::MultipleStatements);
        }

        let mut conn = SqliteConnection::connect_with(&self.options.clone().read_only(true)).await?;
        let rows = sqlx::query(sql).fetch_all(&mut conn).await;
        close(conn).await;

        rows?
            .iter()
            .map(row_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(QueryError::from)
    }
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close query connection");
    }
}

fn row_to_json(row: &SqliteRow) -> Result<Map<String, Value>, sqlx::Error> {
    let mut map = Map::with_capacity(row.len());

    for column in row.columns() {
        let i = column.ordinal();
        let raw = row.try_get_raw(i)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => json!(row.try_get_unchecked::<i64, _>(i)?),
                "REAL" | "NUMERIC" => json!(row.try_get_unchecked::<f64, _>(i)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get_unchecked(i)?;
                    Value::String(format!("<blob {} bytes>", bytes.len()))
                }
                _ => Value::String(row.try_get_unchecked::<String, _>(i)?),
            }
        };

        map.insert(column.name().to_string(), value);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmployeeInput;
    use crate::testing::temp_pool;

    async fn seeded() -> (tempfile::TempDir, EmployeeQueries) {
        let (dir, pool) = temp_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let eng = department::insert(&mut conn, "Engineering").await.unwrap();
        let ops = department::insert(&mut conn, "Operations").await.unwrap();
        for (name, dept, salary) in [
            ("Ada", Some(eng), Some(120000.0)),
            ("Grace", Some(eng), Some(100000.0)),
            ("Linus", Some(ops), Some(90000.0)),
            ("Nobody", None, None),
        ] {
            employee::insert(
                &mut conn,
                &EmployeeInput {
                    name: name.into(),
                    department_id: dept,
                    salary,
                    hire_date: Some("2023-01-15".into()),
                },
            )
            .await
            .unwrap();
        }
        drop(conn);
        pool.close().await;

        let queries = EmployeeQueries::from_url(&crate::testing::url_for(&dir)).unwrap();
        (dir, queries)
    }

    #[tokio::test]
    async fn list_employees_clamps_limit() {
        let (_dir, queries) = seeded().await;

        assert_eq!(queries.list_employees(None).await.unwrap().len(), 4);
        assert_eq!(queries.list_employees(Some(2)).await.unwrap().len(), 2);
        assert_eq!(queries.list_employees(Some(0)).await.unwrap().len(), 1);
        assert_eq!(queries.list_employees(Some(-5)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_employee_returns_none_when_missing() {
        let (_dir, queries) = seeded().await;

        let ada = queries.get_employee(1).await.unwrap().unwrap();
        assert_eq!(ada.department_name.as_deref(), Some("Engineering"));
        assert!(queries.get_employee(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_and_filters_match_every_row() {
        let (_dir, queries) = seeded().await;

        let rows = queries
            .search_employees(Some("a"), Some("Eng"), None)
            .await
            .unwrap();
        assert!(!rows.is_empty());
        for row in &rows {
            assert!(row.name.contains('a'));
            assert!(row.department_name.as_deref().unwrap().contains("Eng"));
        }
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn department_stats_match_independent_aggregates() {
        let (_dir, queries) = seeded().await;

        let everyone = queries.list_employees(None).await.unwrap();
        for dept in queries.list_departments().await.unwrap() {
            let salaries: Vec<f64> = everyone
                .iter()
                .filter(|e| e.department_id == Some(dept.id))
                .filter_map(|e| e.salary)
                .collect();
            let stats = queries.employee_stats(Some(dept.id)).await.unwrap();

            assert_eq!(stats.total_employees as usize, salaries.len());
            let avg = salaries.iter().sum::<f64>() / salaries.len() as f64;
            assert_eq!(stats.avg_salary, Some(avg));
            assert_eq!(stats.min_salary, salaries.iter().cloned().reduce(f64::min));
            assert_eq!(stats.max_salary, salaries.iter().cloned().reduce(f64::max));
        }
    }

    #[tokio::test]
    async fn department_zero_means_company_wide_stats() {
        let (_dir, queries) = seeded().await;

        let everyone = queries.employee_stats(None).await.unwrap();
        assert_eq!(everyone.total_employees, 4);
        assert_eq!(queries.employee_stats(Some(0)).await.unwrap(), everyone);
    }

    #[tokio::test]
    async fn safe_query_returns_column_maps() {
        let (_dir, queries) = seeded().await;

        let rows = queries
            .safe_query("SELECT id, name, salary FROM employees WHERE id = 1")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[0]["name"], json!("Ada"));
        assert_eq!(rows[0]["salary"], json!(120000.0));
        let columns: Vec<&String> = rows[0].keys().collect();
        assert_eq!(columns, ["id", "name", "salary"]);
    }

    #[tokio::test]
    async fn safe_query_rejects_before_touching_the_database() {
        let (_dir, queries) = seeded().await;

        let err = queries
            .safe_query("select * from employees; --")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Unsafe));

        let err = queries.safe_query("PRAGMA table_info(employees)").await.unwrap_err();
        assert!(matches!(err, QueryError::Unsafe));

        assert_eq!(queries.list_employees(None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn safe_query_engine_errors_are_reported() {
        let (_dir, queries) = seeded().await;

        let err = queries.safe_query("select * from nowhere").await.unwrap_err();
        assert!(matches!(err, QueryError::Sql(_)));
        assert!(err.to_string().starts_with("SQL Error: "));
    }

    #[tokio::test]
    async fn safe_query_runs_a_single_statement_only() {
        let (_dir, queries) = seeded().await;

        let err = queries
            .safe_query("select 1 as a; select 2 as a")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::MultipleStatements));
        assert_eq!(
            err.to_string(),
            "SQL Error: You can only execute one statement at a time."
        );

        let rows = queries.safe_query("select ';' as a;").await.unwrap();
        assert_eq!(rows[0]["a"], json!(";"));
    }

    #[tokio::test]
    async fn missing_database_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let queries = EmployeeQueries::from_url(&crate::testing::url_for(&dir)).unwrap();

        assert!(queries.list_departments().await.is_err());
    }
}
