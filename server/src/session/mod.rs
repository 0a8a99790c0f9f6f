//! Browser sessions: an opaque token in a cookie, mapped server-side to the
//! identity id. Only the id is stored; the user row is re-read per request.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use anyhow::Result;
use async_trait::async_trait;

use crate::config::SessionConfig;

pub mod memory;
pub mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

pub const SESSION_COOKIE: &str = "sid";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a session for `twitch_id` and return its token.
    async fn create(&self, twitch_id: &str) -> Result<String>;
    /// Identity id behind `token`, if the session is still alive. Extends its TTL.
    async fn resolve(&self, token: &str) -> Result<Option<String>>;
    async fn destroy(&self, token: &str) -> Result<()>;
    async fn ping(&self) -> Result<()>;
}

/// 256 bits of randomness, hex.
pub fn new_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

pub fn session_cookie(token: String, cfg: &SessionConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.cookie_secure)
        .max_age(CookieDuration::seconds(cfg.ttl_secs as i64))
        .finish()
}

/// A cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}
