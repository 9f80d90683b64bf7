use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use tracing::error;

use crate::views;

/// Failures the web layer turns into an error page.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        error!(error = %err, "Database error");
        AppError::Database(err)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // database details stay in the log
        let message = match self {
            AppError::Database(_) => "Something went wrong, Contact with system admin".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(views::error_page(self.status_code(), &message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_variant() {
        assert_eq!(AppError::NotFound("Employee").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(AppError::NotFound("Employee").to_string(), "Employee not found");
    }
}
