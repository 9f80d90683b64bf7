use employee_records::db::init_db;
use employee_records::direct::DirectInterface;
use employee_records::model::EmployeeInput;
use employee_records::repository::{department, employee};
use employee_records::service::EmployeeQueries;
use serde_json::{Value, json};
use tempfile::TempDir;

fn database_url(dir: &TempDir) -> String {
    format!("sqlite:{}", dir.path().join("scenario.db").display())
}

#[tokio::test]
async fn engineering_scenario_through_the_query_tools() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);

    let pool = init_db(&url).await.unwrap();
    let mut conn = pool.acquire().await.unwrap();
    let eng = department::insert(&mut conn, "Engineering").await.unwrap();
    assert_eq!(eng, 1);
    employee::insert(
        &mut conn,
        &EmployeeInput {
            name: "Ada".into(),
            department_id: Some(eng),
            salary: Some(120000.0),
            hire_date: Some("2023-01-15".into()),
        },
    )
    .await
    .unwrap();
    drop(conn);
    pool.close().await;

    let direct = DirectInterface::new(EmployeeQueries::from_url(&url).unwrap());

    let rows: Value =
        serde_json::from_str(&direct.call_tool("list_employees", json!({"limit": 10})).await).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["department_name"], "Engineering");

    let stats: Value = serde_json::from_str(
        &direct
            .call_tool("get_employee_stats", json!({"department_id": 1}))
            .await,
    )
    .unwrap();
    assert_eq!(stats["total_employees"], 1);
    assert_eq!(stats["avg_salary"], 120000.0);
    assert_eq!(stats["min_salary"], 120000.0);
    assert_eq!(stats["max_salary"], 120000.0);
}

#[tokio::test]
async fn created_employee_reads_back_with_department_name() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);
    let pool = init_db(&url).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let ops = department::insert(&mut tx, "Operations").await.unwrap();
    let id = employee::insert(
        &mut tx,
        &EmployeeInput {
            name: "Linus".into(),
            department_id: Some(ops),
            salary: Some(90500.5),
            hire_date: Some("2021-06-01".into()),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    pool.close().await;

    let queries = EmployeeQueries::from_url(&url).unwrap();
    let record = queries.get_employee(id).await.unwrap().unwrap();
    assert_eq!(record.name, "Linus");
    assert_eq!(record.department_id, Some(ops));
    assert_eq!(record.department_name.as_deref(), Some("Operations"));
    assert_eq!(record.salary, Some(90500.5));
    assert_eq!(record.hire_date.as_deref(), Some("2021-06-01"));
}

#[tokio::test]
async fn deleting_a_missing_employee_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_db(&database_url(&dir)).await.unwrap();
    let mut conn = pool.acquire().await.unwrap();

    employee::insert(
        &mut conn,
        &EmployeeInput {
            name: "Grace".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(employee::delete(&mut conn, 999).await.unwrap(), 0);
    assert_eq!(employee::find_all(&mut conn).await.unwrap().len(), 1);
}

#[tokio::test]
async fn passthrough_refuses_writes_and_still_reads() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);
    init_db(&url).await.unwrap().close().await;

    let queries = EmployeeQueries::from_url(&url).unwrap();
    assert!(queries.safe_query("INSERT INTO departments VALUES (1, 'x')").await.is_err());

    let rows = queries
        .safe_query("select count(*) as departments from departments")
        .await
        .unwrap();
    assert_eq!(rows[0]["departments"], 0);
}
