use crate::{
    api::flash::{Flash, html_page, redirect_with},
    error::AppError,
    repository::department,
    views,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct DepartmentForm {
    pub name: String,
}

pub async fn list_departments(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let departments = department::find_all(&mut conn).await?;

    let flash = Flash::from_request(&req);
    Ok(html_page(&req, views::department_list(&departments, flash.as_ref())))
}

pub async fn create_department(
    pool: web::Data<SqlitePool>,
    form: web::Form<DepartmentForm>,
) -> Result<HttpResponse, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(redirect_with("/departments", Flash::error("Name is required")));
    }

    let mut conn = pool.acquire().await?;
    let flash = match department::insert(&mut conn, name).await {
        Ok(id) => {
            info!(department_id = id, "Department created");
            Flash::success("Department created successfully!")
        }
        Err(e) => {
            error!(error = %e, "Failed to create department");
            Flash::error(format!("Error creating department: {e}"))
        }
    };

    Ok(redirect_with("/departments", flash))
}
