//! Liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::state::AppState;

#[get("/healthz")]
pub async fn healthz(state: web::Data<AppState>) -> impl Responder {
    if let Err(e) = state.store.ping().await {
        log::warn!("healthz: store unreachable: {e:#}");
        return HttpResponse::ServiceUnavailable().body("db");
    }
    if let Err(e) = state.sessions.ping().await {
        log::warn!("healthz: session store unreachable: {e:#}");
        return HttpResponse::ServiceUnavailable().body("sessions");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
