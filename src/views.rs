//! Server-side HTML for the record pages.

use crate::api::employee::EmployeeForm;
use crate::api::flash::{Flash, FlashKind};
use crate::model::{Department, EmployeeRecord};
use actix_web::http::StatusCode;
use std::fmt::Write;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let notice = match flash {
        Some(flash) => {
            let class = match flash.kind {
                FlashKind::Success => "flash success",
                FlashKind::Error => "flash error",
            };
            format!(r#"<div class="{class}">{}</div>"#, escape(&flash.message))
        }
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Employee Records</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/employees">Employees</a> | <a href="/departments">Departments</a></nav>
{notice}
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index_page() -> String {
    layout(
        "Employee Records",
        None,
        r#"<ul>
<li><a href="/employees">Browse employees</a></li>
<li><a href="/employees/new">Add an employee</a></li>
<li><a href="/departments">Departments</a></li>
<li><a href="/api/employees">Employee list as JSON</a></li>
</ul>"#,
    )
}

fn optional(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_default()
}

pub fn employee_list(employees: &[EmployeeRecord], flash: Option<&Flash>) -> String {
    let mut body = String::from(
        r#"<p><a href="/employees/new">Add employee</a></p>
<table>
<thead><tr><th>ID</th><th>Name</th><th>Department</th><th>Salary</th><th>Hire date</th><th></th></tr></thead>
<tbody>
"#,
    );

    for e in employees {
        let salary = e.salary.map(|s| format!("{s:.2}")).unwrap_or_default();
        let _ = writeln!(
            body,
            r#"<tr><td>{id}</td><td>{name}</td><td>{dept}</td><td>{salary}</td><td>{hired}</td><td><a href="/employees/{id}/edit">Edit</a> <form method="post" action="/employees/{id}/delete" style="display:inline"><button type="submit">Delete</button></form></td></tr>"#,
            id = e.id,
            name = escape(&e.name),
            dept = optional(e.department_name.as_deref()),
            hired = optional(e.hire_date.as_deref()),
        );
    }

    if employees.is_empty() {
        body.push_str("<tr><td colspan=\"6\">No employees yet.</td></tr>\n");
    }
    body.push_str("</tbody>\n</table>");

    layout("Employees", flash, &body)
}

pub struct FormPage<'a> {
    pub title: &'a str,
    pub action: &'a str,
    pub values: &'a EmployeeForm,
    pub departments: &'a [Department],
    pub flash: Option<&'a Flash>,
}

pub fn employee_form(page: FormPage<'_>) -> String {
    let values = page.values;
    let selected = values.department_id.as_deref().unwrap_or_default();

    let mut options = String::from("<option value=\"\">(none)</option>\n");
    for d in page.departments {
        let id = d.id.to_string();
        let sel = if id == selected { " selected" } else { "" };
        let _ = writeln!(
            options,
            r#"<option value="{id}"{sel}>{}</option>"#,
            escape(&d.name)
        );
    }

    let body = format!(
        r#"<form method="post" action="{action}">
<label>Name <input name="name" required value="{name}"></label><br>
<label>Department <select name="department_id">
{options}</select></label><br>
<label>Salary <input name="salary" value="{salary}"></label><br>
<label>Hire date <input name="hire_date" value="{hire_date}"></label><br>
<button type="submit">Save</button> <a href="/employees">Cancel</a>
</form>"#,
        action = escape(page.action),
        name = escape(&values.name),
        salary = optional(values.salary.as_deref()),
        hire_date = optional(values.hire_date.as_deref()),
    );

    layout(page.title, page.flash, &body)
}

pub fn department_list(departments: &[Department], flash: Option<&Flash>) -> String {
    let mut body = String::from("<ul>\n");
    for d in departments {
        let _ = writeln!(body, "<li>{} - {}</li>", d.id, escape(&d.name));
    }
    body.push_str(
        r#"</ul>
<form method="post" action="/departments">
<label>Name <input name="name" required></label>
<button type="submit">Add department</button>
</form>"#,
    );

    layout("Departments", flash, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(title, None, &format!("<p>{}</p>", escape(message)))
}
