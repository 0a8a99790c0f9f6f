//! Admin dashboard: counters and user management.

use actix_web::{delete, get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{total_pages, PageWindow, User, UserFilter, USERS_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::http::guard::AdminUser;
use crate::http::kingdom::parse_kingdom;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UsersQuery {
    pub pagina: Option<i64>,
    pub busqueda: Option<String>,
}

#[derive(Serialize)]
pub struct UsersPage {
    pub usuarios: Vec<User>,
    pub pagina: i64,
    pub total_paginas: i64,
    pub total: i64,
}

/// `reino: null` clears the kingdom; an absent `reino` is rejected.
#[derive(Deserialize)]
pub struct EditUserReq {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reino: Option<Option<String>>,
}

fn count(n: i64) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "count": n }))
}

/// GET /api/usuarios-count
#[get("/usuarios-count")]
pub async fn users_count(_admin: AdminUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(count(state.store.count_users().await?))
}

/// GET /api/reinos-count
#[get("/reinos-count")]
pub async fn kingdoms_count(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    Ok(count(state.store.count_kingdoms().await?))
}

/// GET /api/legiones-count
#[get("/legiones-count")]
pub async fn legions_count(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    Ok(count(state.store.count_legion_units().await?))
}

/// GET /api/usuarios?pagina=&busqueda=
#[get("/usuarios")]
pub async fn list_users(
    _admin: AdminUser,
    web::Query(params): web::Query<UsersQuery>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let filter = UserFilter::new(params.busqueda.as_deref());
    let window = PageWindow::new(params.pagina, USERS_PAGE_SIZE);

    // Same filter for both queries, or the page metadata drifts.
    let total = state.store.count_users_matching(&filter).await?;
    let usuarios = state
        .store
        .list_users(&filter, window.limit, window.offset)
        .await?;

    Ok(HttpResponse::Ok().json(UsersPage {
        usuarios,
        pagina: window.page,
        total_paginas: total_pages(total, USERS_PAGE_SIZE),
        total,
    }))
}

/// PUT /api/usuarios/{id}
#[put("/usuarios/{id}")]
pub async fn edit_user(
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
    info: web::Json<EditUserReq>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let Some(requested) = &info.reino else {
        return Err(AppError::BadRequest("falta reino".into()));
    };
    let kingdom = requested.as_deref().map(parse_kingdom).transpose()?;

    if !state.store.set_kingdom(&id, kingdom).await? {
        return Err(AppError::NotFound(format!("usuario {id} no existe")));
    }
    log::info!(
        "{} set kingdom of {id} to {}",
        admin.twitch_id,
        kingdom.map_or("none", |k| k.as_str())
    );
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// DELETE /api/usuarios/{id}
#[delete("/usuarios/{id}")]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete_user(&id).await? {
        return Err(AppError::NotFound(format!("usuario {id} no existe")));
    }
    log::info!("{} deleted user {id}", admin.twitch_id);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users_count)
        .service(kingdoms_count)
        .service(legions_count)
        .service(list_users)
        .service(edit_user)
        .service(delete_user);
}
