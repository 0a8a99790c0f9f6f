//! News feed: read by players, written by admins.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::NEWS_LIMIT;
use crate::error::{AppError, AppResult};
use crate::http::guard::{AdminUser, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateNewsReq {
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub resumen: String,
}

/// GET /api/noticias
#[get("/noticias")]
pub async fn list(_user: CurrentUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let items = state.store.latest_news(NEWS_LIMIT).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/noticias
#[post("/noticias")]
pub async fn create(
    AdminUser(admin): AdminUser,
    info: web::Json<CreateNewsReq>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let title = info.titulo.trim();
    let summary = info.resumen.trim();
    if title.is_empty() || summary.is_empty() {
        return Err(AppError::BadRequest("titulo y resumen son obligatorios".into()));
    }

    let item = state.store.create_news(title, summary).await?;
    log::info!("{} published news #{}", admin.twitch_id, item.id);
    Ok(HttpResponse::Created().json(item))
}

/// DELETE /api/noticias/{id}
#[delete("/noticias/{id}")]
pub async fn remove(
    AdminUser(admin): AdminUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete_news(id).await? {
        return Err(AppError::NotFound(format!("noticia {id} no existe")));
    }
    log::info!("{} deleted news #{id}", admin.twitch_id);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create).service(remove);
}
