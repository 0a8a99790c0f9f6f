//! Everything a handler can reach, shared behind `web::Data`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{GameConfig, SessionConfig};
use crate::db::GameStore;
use crate::metrics::Counters;
use crate::session::SessionStore;
use crate::twitch::{GameStatusGateway, IdentityProvider};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub gateway: Arc<dyn GameStatusGateway>,
    pub session: SessionConfig,
    pub game: GameConfig,
    pub static_dir: PathBuf,
    pub counters: Counters,
}
