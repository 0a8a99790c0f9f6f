//! Shared fixtures: in-memory stores, a fake identity provider and a fake
//! Twitch gateway wired into a real `AppState`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web, App};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use reino_server::config::{GameConfig, SessionConfig};
use reino_server::db::{MemoryStore, Role, User};
use reino_server::http;
use reino_server::kingdom::Kingdom;
use reino_server::metrics::Counters;
use reino_server::session::{MemorySessionStore, SessionStore, SESSION_COOKIE};
use reino_server::state::AppState;
use reino_server::twitch::{
    Broadcaster, Clip, ClipList, ClipQuery, GameStatusGateway, GatewayError, IdentityProvider,
    StreamStatus, TwitchProfile,
};

pub const SECRET: &str = "test-secret-test-secret-test-secret";
pub const ADMIN_ID: &str = "900";

//////////////////////////////////////////////////
// Fakes
//////////////////////////////////////////////////

/// Hands out the profile registered for each authorization code.
#[derive(Default)]
pub struct FakeIdentity {
    profiles: HashMap<String, TwitchProfile>,
}

impl FakeIdentity {
    pub fn with(mut self, code: &str, id: &str, name: &str) -> Self {
        self.profiles.insert(
            code.to_owned(),
            TwitchProfile {
                id: id.to_owned(),
                login: name.to_lowercase(),
                display_name: name.to_owned(),
                profile_image_url: Some(format!("https://img.example/{id}.png")),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://id.example/authorize?state={state}")
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<TwitchProfile> {
        self.profiles
            .get(code)
            .cloned()
            .ok_or_else(|| anyhow!("code {code} was not issued"))
    }
}

/// Knows one channel, `dearbird` (id 42), live with two clips.
#[derive(Default)]
pub struct FakeGateway {
    pub down: AtomicBool,
}

impl FakeGateway {
    fn check(&self) -> Result<(), GatewayError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Upstream(anyhow!("helix unreachable")));
        }
        Ok(())
    }

    fn clip(n: u64) -> Clip {
        Clip {
            id: format!("clip{n}"),
            url: format!("https://clips.example/clip{n}"),
            embed_url: format!("https://clips.example/embed/clip{n}"),
            title: format!("Clip {n}"),
            creator_name: "viewer".into(),
            view_count: n * 10,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            thumbnail_url: format!("https://clips.example/clip{n}.jpg"),
            duration: 30.0,
        }
    }
}

#[async_trait]
impl GameStatusGateway for FakeGateway {
    async fn stream_status(&self, channel: &str) -> Result<StreamStatus, GatewayError> {
        self.check()?;
        if channel != "dearbird" {
            return Err(GatewayError::NotFound(format!("canal {channel} no existe")));
        }
        Ok(StreamStatus {
            channel: channel.to_owned(),
            user_id: "42".into(),
            display_name: "DearBird".into(),
            profile_image_url: None,
            live: true,
            title: Some("Conquistando reinos".into()),
            game_name: Some("Strategy".into()),
            viewer_count: Some(120),
            started_at: None,
        })
    }

    async fn recent_clips(&self, query: &ClipQuery) -> Result<ClipList, GatewayError> {
        self.check()?;
        let known = match &query.broadcaster {
            Broadcaster::Id(id) => id == "42",
            Broadcaster::Login(login) => login == "dearbird",
        };
        if !known {
            return Err(GatewayError::NotFound("broadcaster no existe".into()));
        }
        Ok(ClipList {
            broadcaster_id: "42".into(),
            clips: (1..=2).take(query.first as usize).map(Self::clip).collect(),
        })
    }
}

//////////////////////////////////////////////////
// App wiring
//////////////////////////////////////////////////

pub struct TestKit {
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub gateway: Arc<FakeGateway>,
    pub state: AppState,
}

impl TestKit {
    pub fn new() -> Self {
        Self::with_identity(FakeIdentity::default())
    }

    pub fn with_identity(identity: FakeIdentity) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(3600)));
        let gateway = Arc::new(FakeGateway::default());
        let state = AppState {
            store: store.clone(),
            sessions: sessions.clone(),
            identity: Arc::new(identity),
            gateway: gateway.clone(),
            session: SessionConfig {
                secret: SECRET.into(),
                ttl_secs: 3600,
                cookie_secure: false,
            },
            game: GameConfig {
                starting_coins: 100,
                admin_ids: vec![ADMIN_ID.into()],
            },
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
            counters: Counters::new().expect("counters"),
        };
        TestKit {
            store,
            sessions,
            gateway,
            state,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .configure(http::routes::init_routes)
    }

    /// Seed a user row directly.
    pub fn user(&self, id: &str, name: &str, role: Role, kingdom: Option<Kingdom>) -> User {
        let user = User {
            twitch_id: id.into(),
            display_name: name.into(),
            profile_image_url: None,
            role,
            kingdom,
            coins: 100,
            wins: 3,
            losses: 1,
            buildings: 2,
            troops_lost: 5,
            created_at: Utc::now(),
        };
        self.store.put_user(user.clone());
        user
    }

    /// Open a session without going through the OAuth dance.
    pub async fn session_for(&self, twitch_id: &str) -> Cookie<'static> {
        let token = self.sessions.create(twitch_id).await.expect("session");
        Cookie::new(SESSION_COOKIE, token)
    }

    pub async fn player(&self, id: &str, kingdom: Option<Kingdom>) -> Cookie<'static> {
        self.user(id, &format!("player{id}"), Role::User, kingdom);
        self.session_for(id).await
    }

    pub async fn admin(&self) -> Cookie<'static> {
        self.user(ADMIN_ID, "Admin", Role::Admin, Some(Kingdom::Fuego));
        self.session_for(ADMIN_ID).await
    }
}

//////////////////////////////////////////////////
// Request helpers
//////////////////////////////////////////////////

pub fn location(resp: &ServiceResponse) -> Option<String> {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

pub fn cookie_named(resp: &ServiceResponse, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

pub async fn json_body(resp: ServiceResponse) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}
