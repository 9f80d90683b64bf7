use crate::model::{Department, EmployeeRecord};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Records API",
        version = "1.0.0",
        description = r#"
## Employee Records

Read-only JSON view over the employee records managed through the web pages.

- `GET /api/employees` returns every employee with the department name joined in.

The endpoint is rate limited per client IP.
"#,
    ),
    paths(crate::api::employee::api_employees),
    components(schemas(EmployeeRecord, Department)),
    tags(
        (name = "Employee", description = "Employee record APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_the_employee_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/employees"));
    }
}
