use crate::error::AppError;
use crate::http;
use actix_web::web;

/// Malformed or missing JSON bodies answer in the same `{success, message}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("rejected JSON body on {}: {err}", req.path());
        AppError::BadRequest(format!("cuerpo JSON inválido: {err}")).into()
    })
}

/// Pages, login flow and kingdom selection at the root; JSON under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(http::auth::init_routes)
        .configure(http::pages::init_routes)
        .configure(http::kingdom::init_routes)
        .service(
            web::scope("/api")
                .configure(http::profile::init_routes)
                .configure(http::kingdom::init_api_routes)
                .configure(http::news::init_routes)
                .configure(http::admin::init_routes)
                .configure(http::twitch::init_routes)
                .configure(http::health::init_routes),
        );
}
