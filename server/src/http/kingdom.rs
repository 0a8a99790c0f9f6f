//! Kingdom selection and the catalog the chooser page renders.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::http::guard::CurrentUser;
use crate::kingdom::{Kingdom, TroopType};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetKingdomReq {
    pub reino: String,
}

#[derive(Serialize)]
pub struct KingdomEntry {
    pub reino: Kingdom,
    pub tropa_exclusiva: TroopType,
}

#[derive(Serialize)]
pub struct Catalog {
    pub reinos: Vec<KingdomEntry>,
    pub tropas_comunes: Vec<TroopType>,
}

pub fn parse_kingdom(raw: &str) -> AppResult<Kingdom> {
    raw.parse::<Kingdom>()
        .map_err(|_| AppError::BadRequest(format!("reino desconocido: {raw:?}")))
}

/// POST /set-reino
#[post("/set-reino")]
pub async fn set_kingdom(
    CurrentUser(user): CurrentUser,
    info: web::Json<SetKingdomReq>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let kingdom = parse_kingdom(&info.reino)?;

    // The store is authoritative; nothing session-side changes until it succeeds.
    if !state.store.set_kingdom(&user.twitch_id, Some(kingdom)).await? {
        return Err(AppError::NotFound("usuario no encontrado".into()));
    }
    log::info!("{} joined kingdom {kingdom}", user.twitch_id);

    Ok(HttpResponse::Ok().json(json!({ "success": true, "reino": kingdom })))
}

/// GET /api/reinos
#[get("/reinos")]
pub async fn catalog(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(Catalog {
        reinos: Kingdom::ALL
            .into_iter()
            .map(|k| KingdomEntry {
                reino: k,
                tropa_exclusiva: k.exclusive_troop(),
            })
            .collect(),
        tropas_comunes: TroopType::common().collect(),
    })
}

/// Mounted at the site root.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(set_kingdom);
}

/// Mounted under `/api`.
pub fn init_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog);
}
