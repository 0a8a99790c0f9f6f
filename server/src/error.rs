//! One error type for every handler, rendered per route class.
//!
//! Page routes answer with a redirect to `/login` or an HTML denial; JSON
//! routes answer with `{"success": false, "message": ...}`.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::twitch::GatewayError;

pub const DENIED_PAGE: &str = "<!doctype html><html lang=\"es\"><head><meta charset=\"utf-8\">\
<title>Acceso denegado</title></head><body><h1>Acceso denegado</h1>\
<p><a href=\"/\">Volver</a></p></body></html>";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ----- JSON routes -----
    #[error("login required")]
    Unauthorized,
    #[error("admin role required")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),

    // ----- page routes -----
    #[error("login required")]
    LoginRequired,
    #[error("access denied")]
    AccessDenied,

    // ----- either -----
    #[error("upstream request failed")]
    Upstream(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(msg) => AppError::NotFound(msg),
            GatewayError::Upstream(e) => AppError::Upstream(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::LoginRequired => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::AccessDenied => HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(DENIED_PAGE),
            AppError::Upstream(e) => {
                log::error!("upstream failure: {e:?}");
                server_error(status)
            }
            AppError::Internal(e) => {
                log::error!("internal error: {e:?}");
                server_error(status)
            }
            other => HttpResponse::build(status)
                .json(json!({ "success": false, "message": other.to_string() })),
        }
    }
}

/// Causes stay in the log, never in the body.
fn server_error(status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "success": false, "message": "Error del servidor" }))
}
