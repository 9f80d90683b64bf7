use crate::{
    api::flash::{Flash, html_page, redirect_with},
    error::AppError,
    model::{Department, EmployeeInput, EmployeeRecord},
    repository::{department, employee},
    views::{self, FormPage},
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{error, info};

const NEW_TITLE: &str = "New Employee";
const NEW_ACTION: &str = "/employees/new";
const EDIT_TITLE: &str = "Edit Employee";

/// Raw form fields as submitted. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EmployeeForm {
    pub name: String,
    pub department_id: Option<String>,
    pub salary: Option<String>,
    pub hire_date: Option<String>,
}

impl EmployeeForm {
    /// Shared by create and edit: an absent salary is stored as NULL on both
    /// paths, an unparseable one aborts both.
    pub fn validate(&self) -> Result<EmployeeInput, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }

        let department_id = match present(&self.department_id) {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| "Invalid department".to_string())?,
            ),
            None => None,
        };

        let salary = match present(&self.salary) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(salary) if salary.is_finite() => Some(salary),
                _ => return Err("Invalid salary format".to_string()),
            },
            None => None,
        };

        Ok(EmployeeInput {
            name: self.name.clone(),
            department_id,
            salary,
            hire_date: present(&self.hire_date).map(str::to_string),
        })
    }
}

impl From<&EmployeeRecord> for EmployeeForm {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            name: record.name.clone(),
            department_id: record.department_id.map(|id| id.to_string()),
            salary: record.salary.map(|s| s.to_string()),
            hire_date: record.hire_date.clone(),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn form_page(
    req: &HttpRequest,
    title: &str,
    action: &str,
    values: &EmployeeForm,
    departments: &[Department],
    flash: Option<Flash>,
) -> HttpResponse {
    html_page(
        req,
        views::employee_form(FormPage {
            title,
            action,
            values,
            departments,
            flash: flash.as_ref(),
        }),
    )
}

pub async fn index(req: HttpRequest) -> HttpResponse {
    html_page(&req, views::index_page())
}

pub async fn list_employees(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let employees = employee::find_all(&mut conn).await?;

    let flash = Flash::from_request(&req);
    Ok(html_page(&req, views::employee_list(&employees, flash.as_ref())))
}

pub async fn new_employee(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let departments = department::find_all(&mut conn).await?;

    Ok(form_page(
        &req,
        NEW_TITLE,
        NEW_ACTION,
        &EmployeeForm::default(),
        &departments,
        None,
    ))
}

pub async fn create_employee(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    form: web::Form<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let outcome = match form.validate() {
        Ok(input) => {
            let mut tx = pool.begin().await?;
            let result = match employee::insert(&mut tx, &input).await {
                Ok(id) => tx.commit().await.map(|_| id),
                Err(e) => {
                    tx.rollback().await?;
                    Err(e)
                }
            };
            result.map_err(|e| {
                error!(error = %e, "Failed to create employee");
                format!("Error creating employee: {e}")
            })
        }
        Err(message) => Err(message),
    };

    match outcome {
        Ok(id) => {
            info!(employee_id = id, "Employee created");
            Ok(redirect_with(
                "/employees",
                Flash::success("Employee created successfully!"),
            ))
        }
        Err(message) => {
            let mut conn = pool.acquire().await?;
            let departments = department::find_all(&mut conn).await?;
            Ok(form_page(
                &req,
                NEW_TITLE,
                NEW_ACTION,
                &form,
                &departments,
                Some(Flash::error(message)),
            ))
        }
    }
}

pub async fn edit_employee(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();

    let mut conn = pool.acquire().await?;
    let record = employee::find_by_id(&mut conn, employee_id)
        .await?
        .ok_or(AppError::NotFound("Employee"))?;
    let departments = department::find_all(&mut conn).await?;

    Ok(form_page(
        &req,
        EDIT_TITLE,
        &format!("/employees/{employee_id}/edit"),
        &EmployeeForm::from(&record),
        &departments,
        None,
    ))
}

pub async fn update_employee(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    form: web::Form<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let form = form.into_inner();

    {
        let mut conn = pool.acquire().await?;
        if employee::find_by_id(&mut conn, employee_id).await?.is_none() {
            return Err(AppError::NotFound("Employee"));
        }
    }

    let outcome = match form.validate() {
        Ok(input) => {
            let mut tx = pool.begin().await?;
            let result = match employee::update(&mut tx, employee_id, &input).await {
                Ok(0) => {
                    tx.rollback().await?;
                    return Err(AppError::NotFound("Employee"));
                }
                Ok(_) => tx.commit().await,
                Err(e) => {
                    tx.rollback().await?;
                    Err(e)
                }
            };
            result.map_err(|e| {
                error!(error = %e, employee_id, "Failed to update employee");
                format!("Error updating employee: {e}")
            })
        }
        Err(message) => Err(message),
    };

    match outcome {
        Ok(()) => {
            info!(employee_id, "Employee updated");
            Ok(redirect_with(
                "/employees",
                Flash::success("Employee updated successfully!"),
            ))
        }
        Err(message) => {
            let mut conn = pool.acquire().await?;
            let departments = department::find_all(&mut conn).await?;
            Ok(form_page(
                &req,
                EDIT_TITLE,
                &format!("/employees/{employee_id}/edit"),
                &form,
                &departments,
                Some(Flash::error(message)),
            ))
        }
    }
}

pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();

    let mut tx = pool.begin().await?;
    let outcome = match employee::delete(&mut tx, employee_id).await {
        Ok(0) => {
            tx.rollback().await?;
            return Err(AppError::NotFound("Employee"));
        }
        Ok(_) => tx.commit().await,
        Err(e) => {
            tx.rollback().await?;
            Err(e)
        }
    };

    let flash = match outcome {
        Ok(()) => {
            info!(employee_id, "Employee deleted");
            Flash::success("Employee deleted successfully!")
        }
        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");
            Flash::error(format!("Error deleting employee: {e}"))
        }
    };

    Ok(redirect_with("/employees", flash))
}

/// List employees as JSON
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Every employee with the department name joined in", body = [EmployeeRecord]),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn api_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let employees = employee::find_all(&mut conn).await?;

    Ok(HttpResponse::Ok().json(employees))
}
