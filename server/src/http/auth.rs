//! Twitch OAuth login (authorization-code flow) and logout.

use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{NewLogin, Role};
use crate::error::{AppError, AppResult};
use crate::session::{removal_cookie, session_cookie, SESSION_COOKIE};
use crate::state::AppState;

pub const STATE_COOKIE: &str = "oauth_state";
const STATE_TTL_MINUTES: i64 = 10;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

/// Signed OAuth `state`; `nonce` must also match the `oauth_state` cookie.
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    nonce: String,
    exp: usize,
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn sign_state(secret: &str, nonce: &str) -> AppResult<String> {
    let exp = (Utc::now() + Duration::minutes(STATE_TTL_MINUTES)).timestamp() as usize;
    let claims = StateClaims {
        nonce: nonce.to_owned(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

/// Nonce inside a valid, unexpired state token.
fn verify_state(secret: &str, token: &str) -> Option<String> {
    decode::<StateClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.nonce)
}

fn redirect(to: &str) -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((header::LOCATION, to));
    builder
}

fn login_failed(reason: &str) -> HttpResponse {
    log::warn!("twitch login rejected: {reason}");
    redirect("/login")
        .cookie(removal_cookie(STATE_COOKIE))
        .finish()
}

//////////////////////////////////////////////////
// GET /auth/twitch
//////////////////////////////////////////////////
#[get("/auth/twitch")]
pub async fn login(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let nonce = Uuid::new_v4().simple().to_string();
    let signed = sign_state(&state.session.secret, &nonce)?;

    let mut nonce_cookie = session_cookie(nonce, &state.session);
    nonce_cookie.set_name(STATE_COOKIE);
    nonce_cookie.set_max_age(actix_web::cookie::time::Duration::minutes(STATE_TTL_MINUTES));

    Ok(redirect(&state.identity.authorize_url(&signed))
        .cookie(nonce_cookie)
        .finish())
}

//////////////////////////////////////////////////
// GET /auth/twitch/callback
//////////////////////////////////////////////////
#[get("/auth/twitch/callback")]
pub async fn callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    // 1) provider-side refusal, forged or stale state
    if let Some(err) = &query.error {
        return Ok(login_failed(&format!("provider returned {err}")));
    }
    let (Some(code), Some(signed)) = (&query.code, &query.state) else {
        return Ok(login_failed("missing code or state"));
    };
    let Some(nonce) = verify_state(&state.session.secret, signed) else {
        return Ok(login_failed("invalid or expired state"));
    };
    if req.cookie(STATE_COOKIE).map(|c| c.value().to_owned()) != Some(nonce) {
        return Ok(login_failed("state does not match this browser"));
    }

    // 2) code → profile
    let profile = match state.identity.exchange_code(code).await {
        Ok(p) => p,
        Err(e) => {
            state.counters.upstream_failures.inc();
            log::error!("twitch code exchange failed: {e:?}");
            return Ok(login_failed("code exchange failed"));
        }
    };

    // 3) create or refresh the user row
    let role = if state.game.is_bootstrap_admin(&profile.id) {
        Role::Admin
    } else {
        Role::User
    };
    let outcome = state
        .store
        .record_login(&NewLogin {
            twitch_id: profile.id,
            display_name: profile.display_name,
            profile_image_url: profile.profile_image_url,
            role,
            starting_coins: state.game.starting_coins,
        })
        .await?;
    state.counters.login(outcome.created);
    log::info!(
        "{} ({}) logged in{}",
        outcome.user.display_name,
        outcome.user.twitch_id,
        if outcome.created { " for the first time" } else { "" }
    );

    // 4) open the session; only the id goes into it
    let token = state.sessions.create(&outcome.user.twitch_id).await?;
    Ok(redirect("/")
        .cookie(session_cookie(token, &state.session))
        .cookie(removal_cookie(STATE_COOKIE))
        .finish())
}

//////////////////////////////////////////////////
// GET /logout
//////////////////////////////////////////////////
#[get("/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value()).await?;
        log::info!("session closed");
    }
    Ok(redirect("/").cookie(removal_cookie(SESSION_COOKIE)).finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(callback).service(logout);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn state_round_trips_with_the_same_secret() {
        let signed = sign_state(SECRET, "abc").unwrap();
        assert_eq!(verify_state(SECRET, &signed).as_deref(), Some("abc"));
    }

    #[test]
    fn state_from_another_secret_is_rejected() {
        let signed = sign_state(SECRET, "abc").unwrap();
        assert_eq!(verify_state("another-secret-another-secret-xx", &signed), None);
        assert_eq!(verify_state(SECRET, "not-a-jwt"), None);
    }
}
