//! Access gates as extractors.
//!
//! Each gate resolves the session cookie, re-reads the user row, then checks
//! the role, so the admin check always runs after authentication. JSON
//! gates fail with 401/403 bodies; page gates redirect or render a denial.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures_util::future::LocalBoxFuture;

use crate::db::User;
use crate::error::AppError;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

/// Authenticated caller on a JSON route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Admin caller on a JSON route.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Authenticated caller on a page route.
#[derive(Debug, Clone)]
pub struct PageUser(pub User);

/// Admin caller on a page route.
#[derive(Debug, Clone)]
pub struct PageAdmin(pub User);

pub(crate) fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow!("application state not configured")))
}

/// Session cookie → identity id → fresh user row. `None` when any link is missing.
pub async fn resolve_user(req: &HttpRequest) -> Result<Option<User>, AppError> {
    let state = app_state(req)?;
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Some(twitch_id) = state.sessions.resolve(cookie.value()).await? else {
        return Ok(None);
    };
    let user = state.store.find_user(&twitch_id).await?;
    if user.is_none() {
        log::info!("session for deleted user {twitch_id} ignored");
    }
    Ok(user)
}

macro_rules! gate {
    ($name:ident, $unauthenticated:expr, $admin_only:expr, $denied:expr) => {
        impl FromRequest for $name {
            type Error = AppError;
            type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let req = req.clone();
                Box::pin(async move {
                    let user = resolve_user(&req).await?.ok_or($unauthenticated)?;
                    if $admin_only && !user.is_admin() {
                        log::warn!("{} denied admin route {}", user.twitch_id, req.path());
                        return Err($denied);
                    }
                    Ok($name(user))
                })
            }
        }
    };
}

gate!(CurrentUser, AppError::Unauthorized, false, AppError::Forbidden);
gate!(AdminUser, AppError::Unauthorized, true, AppError::Forbidden);
gate!(PageUser, AppError::LoginRequired, false, AppError::AccessDenied);
gate!(PageAdmin, AppError::LoginRequired, true, AppError::AccessDenied);
