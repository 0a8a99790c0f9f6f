//! Public proxies for the channel's live status and recent clips.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::twitch::{Broadcaster, ClipQuery, GatewayError};

#[derive(Deserialize)]
pub struct StatusQuery {
    pub channel: Option<String>,
}

#[derive(Deserialize)]
pub struct ClipsQuery {
    pub broadcaster_id: Option<String>,
    pub channel: Option<String>,
    pub first: Option<u32>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn upstream(state: &AppState, err: GatewayError) -> AppError {
    if matches!(err, GatewayError::Upstream(_)) {
        state.counters.upstream_failures.inc();
    }
    err.into()
}

/// GET /api/twitch_status?channel=
#[get("/twitch_status")]
pub async fn status(
    web::Query(q): web::Query<StatusQuery>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let channel =
        non_blank(q.channel).ok_or_else(|| AppError::BadRequest("falta channel".into()))?;
    let status = state
        .gateway
        .stream_status(&channel)
        .await
        .map_err(|e| upstream(&state, e))?;
    Ok(HttpResponse::Ok().json(status))
}

/// GET /api/twitch_clips?broadcaster_id=|channel=&first=
///
/// `broadcaster_id` wins when both are given.
#[get("/twitch_clips")]
pub async fn clips(
    web::Query(q): web::Query<ClipsQuery>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let broadcaster = match (non_blank(q.broadcaster_id), non_blank(q.channel)) {
        (Some(id), _) => Broadcaster::Id(id),
        (None, Some(login)) => Broadcaster::Login(login),
        (None, None) => {
            return Err(AppError::BadRequest(
                "falta broadcaster_id o channel".into(),
            ))
        }
    };
    let list = state
        .gateway
        .recent_clips(&ClipQuery::new(broadcaster, q.first))
        .await
        .map_err(|e| upstream(&state, e))?;
    Ok(HttpResponse::Ok().json(list))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(status).service(clips);
}
