use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee row left-joined with its department name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Ada",
        "department_id": 1,
        "department_name": "Engineering",
        "salary": 120000.0,
        "hire_date": "2023-01-15"
    })
)]
pub struct EmployeeRecord {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Ada")]
    pub name: String,

    #[schema(example = 1, nullable = true)]
    pub department_id: Option<i64>,

    #[schema(example = "Engineering", nullable = true)]
    pub department_name: Option<String>,

    #[schema(example = 120000.0, nullable = true)]
    pub salary: Option<f64>,

    /// Free text, no date format is enforced.
    #[schema(example = "2023-01-15", nullable = true)]
    pub hire_date: Option<String>,
}

/// The four mutable columns, written as a whole on create and on edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeInput {
    pub name: String,
    pub department_id: Option<i64>,
    pub salary: Option<f64>,
    pub hire_date: Option<String>,
}

impl From<&EmployeeRecord> for EmployeeInput {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            name: record.name.clone(),
            department_id: record.department_id,
            salary: record.salary,
            hire_date: record.hire_date.clone(),
        }
    }
}

/// Salary aggregates over a set of employees. Aggregates over no salaries are null.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct EmployeeStats {
    pub total_employees: i64,
    pub avg_salary: Option<f64>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}
