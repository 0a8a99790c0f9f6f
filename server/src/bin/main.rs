use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use reino_server::config::Config;
use reino_server::db::PgStore;
use reino_server::metrics::{self, Counters};
use reino_server::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use reino_server::state::AppState;
use reino_server::twitch::HelixClient;
use reino_server::http;

fn startup<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> io::Error {
    move |e| io::Error::other(format!("{what}: {e:#}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let cfg = Config::from_env().map_err(startup("config"))?;
    log::debug!("{cfg:?}");

    // Postgres pool
    let store = PgStore::connect(&cfg.database)
        .await
        .map_err(startup("postgres"))?;

    // Sessions: Redis when configured, process memory otherwise
    let sessions: Arc<dyn SessionStore> = match &cfg.redis_url {
        Some(url) => Arc::new(
            RedisSessionStore::open(url, cfg.session.ttl_secs).map_err(startup("redis"))?,
        ),
        None => {
            log::warn!("REDIS_URL not set; sessions are kept in memory and lost on restart");
            Arc::new(MemorySessionStore::new(Duration::from_secs(
                cfg.session.ttl_secs,
            )))
        }
    };

    let twitch = Arc::new(HelixClient::new(&cfg.twitch).map_err(startup("http client"))?);

    // Metrics
    let prometheus = metrics::build().map_err(startup("metrics"))?;
    let counters = Counters::new().map_err(startup("metrics"))?;
    counters
        .register(&prometheus.registry)
        .map_err(startup("metrics"))?;

    let state = AppState {
        store: Arc::new(store),
        sessions,
        identity: twitch.clone(),
        gateway: twitch,
        session: cfg.session.clone(),
        game: cfg.game.clone(),
        static_dir: cfg.static_dir.clone(),
        counters,
    };

    log::info!("listening on {}", cfg.server_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(web::Data::new(state.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await
}
