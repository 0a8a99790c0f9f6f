//! HTML pages. Page routes redirect to `/login` instead of answering 401.

use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use anyhow::Context;

use crate::error::AppResult;
use crate::http::guard::{PageAdmin, PageUser};
use crate::state::AppState;

async fn serve(state: &AppState, file: &str) -> AppResult<HttpResponse> {
    let path = state.static_dir.join(file);
    let html = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading page {}", path.display()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

fn redirect(to: &'static str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, to))
        .finish()
}

#[get("/login")]
pub async fn login_page(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    serve(&state, "login.html").await
}

/// Kingdom-less users are sent to pick one first.
#[get("/")]
pub async fn home(PageUser(user): PageUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if user.kingdom.is_none() {
        return Ok(redirect("/choose-reino"));
    }
    serve(&state, "main.html").await
}

#[get("/choose-reino")]
pub async fn choose_kingdom(
    PageUser(user): PageUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    if user.kingdom.is_some() {
        return Ok(redirect("/"));
    }
    serve(&state, "choose-reino.html").await
}

#[get("/admin")]
pub async fn admin(_admin: PageAdmin, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    serve(&state, "admin.html").await
}

#[get("/mapa")]
pub async fn map(_user: PageUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    serve(&state, "mapa.html").await
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(home)
        .service(choose_kingdom)
        .service(admin)
        .service(map);
}
