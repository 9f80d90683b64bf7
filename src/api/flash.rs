//! One-shot notices carried across a redirect in a cookie.

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use strum_macros::{Display, EnumString};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_COOKIE)?;
        Self::parse(cookie.value())
    }

    fn parse(value: &str) -> Option<Self> {
        let (kind, message) = value.split_once(':')?;
        Some(Self {
            kind: kind.parse().ok()?,
            message: message.to_string(),
        })
    }

    fn to_cookie(&self) -> Cookie<'static> {
        // `;` would end the cookie value early
        let message: String = self
            .message
            .chars()
            .map(|c| if c == ';' || c.is_control() { ' ' } else { c })
            .collect();

        Cookie::build(FLASH_COOKIE, format!("{}:{}", self.kind, message))
            .path("/")
            .http_only(true)
            .finish()
    }
}

/// 303 to `location`, leaving `flash` for the next page.
pub fn redirect_with(location: &str, flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash.to_cookie())
        .finish()
}

/// Renders an HTML page and expires any flash the request carried.
pub fn html_page(req: &HttpRequest, body: String) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");

    if req.cookie(FLASH_COOKIE).is_some() {
        let mut removal = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        removal.make_removal();
        response.cookie(removal);
    }

    response.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_round_trips() {
        let flash = Flash::error("Error deleting employee: locked; try again");
        let cookie = flash.to_cookie();
        assert_eq!(cookie.path(), Some("/"));

        let parsed = Flash::parse(cookie.value()).unwrap();
        assert_eq!(parsed.kind, FlashKind::Error);
        assert_eq!(parsed.message, "Error deleting employee: locked  try again");
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        assert_eq!(Flash::parse("nonsense"), None);
        assert_eq!(Flash::parse("warning:hi"), None);
    }

    #[test]
    fn redirect_sets_location_and_cookie() {
        let response = redirect_with("/employees", Flash::success("done"));
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/employees"
        );
        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }
}
