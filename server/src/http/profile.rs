//! The caller's own profile, legion, activity and counters.

use actix_web::{get, web, HttpResponse};

use crate::db::{LegionEntry, ACTIVITY_LIMIT};
use crate::error::AppResult;
use crate::http::guard::CurrentUser;
use crate::state::AppState;

/// GET /api/usuario
#[get("/usuario")]
pub async fn me(CurrentUser(user): CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}

/// GET /api/tropas
///
/// Exclusive troops of another kingdom are withheld.
#[get("/tropas")]
pub async fn troops(
    CurrentUser(user): CurrentUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let legion: Vec<LegionEntry> = state
        .store
        .legion(&user.twitch_id)
        .await?
        .into_iter()
        .filter(|entry| {
            let ok = entry.troop_type.available_to(user.kingdom);
            if !ok {
                log::warn!(
                    "{} holds {} outside its kingdom; withheld",
                    user.twitch_id,
                    entry.troop_type
                );
            }
            ok
        })
        .collect();
    Ok(HttpResponse::Ok().json(legion))
}

/// GET /api/actividad
#[get("/actividad")]
pub async fn activity(
    CurrentUser(user): CurrentUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let rows = state
        .store
        .recent_activity(&user.twitch_id, ACTIVITY_LIMIT)
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/estadisticas
#[get("/estadisticas")]
pub async fn stats(CurrentUser(user): CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user.stats())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me)
        .service(troops)
        .service(activity)
        .service(stats);
}
