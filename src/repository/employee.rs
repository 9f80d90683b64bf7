//! Employee queries. Every read returns rows left-joined with `departments`.

use crate::model::{EmployeeInput, EmployeeRecord, EmployeeStats};
use sqlx::SqliteConnection;
use tracing::debug;

const SELECT_JOINED: &str = r#"
    SELECT e.id, e.name, e.department_id, d.name AS department_name,
           e.salary, e.hire_date
    FROM employees e
    LEFT JOIN departments d ON e.department_id = d.id
"#;

pub async fn find_all(conn: &mut SqliteConnection) -> Result<Vec<EmployeeRecord>, sqlx::Error> {
    let sql = format!("{SELECT_JOINED} ORDER BY e.id");
    sqlx::query_as::<_, EmployeeRecord>(&sql)
        .fetch_all(conn)
        .await
}

pub async fn find_page(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<EmployeeRecord>, sqlx::Error> {
    let sql = format!("{SELECT_JOINED} ORDER BY e.id LIMIT ?");
    sqlx::query_as::<_, EmployeeRecord>(&sql)
        .bind(limit)
        .fetch_all(conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<EmployeeRecord>, sqlx::Error> {
    let sql = format!("{SELECT_JOINED} WHERE e.id = ?");
    sqlx::query_as::<_, EmployeeRecord>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Case-sensitive substring search. Empty filters are ignored, the rest are ANDed.
pub async fn search(
    conn: &mut SqliteConnection,
    name: &str,
    department: &str,
    limit: i64,
) -> Result<Vec<EmployeeRecord>, sqlx::Error> {
    let mut conditions = Vec::new();
    let mut bindings = Vec::new();

    if !name.is_empty() {
        conditions.push("e.name GLOB ?");
        bindings.push(contains_pattern(name));
    }

    if !department.is_empty() {
        conditions.push("d.name GLOB ?");
        bindings.push(contains_pattern(department));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("{SELECT_JOINED} {where_clause} ORDER BY e.id LIMIT ?");
    debug!(sql = %sql, bindings = ?bindings, limit, "Searching employees");

    let mut query = sqlx::query_as::<_, EmployeeRecord>(&sql);
    for b in &bindings {
        query = query.bind(b);
    }

    query.bind(limit).fetch_all(conn).await
}

pub async fn stats(
    conn: &mut SqliteConnection,
    department_id: Option<i64>,
) -> Result<EmployeeStats, sqlx::Error> {
    const SELECT_STATS: &str = r#"
        SELECT COUNT(*) AS total_employees,
               AVG(salary) AS avg_salary,
               MIN(salary) AS min_salary,
               MAX(salary) AS max_salary
        FROM employees
    "#;

    match department_id {
        Some(department_id) => {
            let sql = format!("{SELECT_STATS} WHERE department_id = ?");
            sqlx::query_as::<_, EmployeeStats>(&sql)
                .bind(department_id)
                .fetch_one(conn)
                .await
        }
        None => {
            sqlx::query_as::<_, EmployeeStats>(SELECT_STATS)
                .fetch_one(conn)
                .await
        }
    }
}

pub async fn insert(conn: &mut SqliteConnection, input: &EmployeeInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, department_id, salary, hire_date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(input.department_id)
    .bind(input.salary)
    .bind(&input.hire_date)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrites all four mutable columns. Returns the number of rows touched.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: &EmployeeInput,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, department_id = ?, salary = ?, hire_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(input.department_id)
    .bind(input.salary)
    .bind(&input.hire_date)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// `*needle*` as a GLOB pattern, with the needle's own metacharacters escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('*');
    for c in needle.chars() {
        match c {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}
