//! Twitch as identity provider (OAuth authorization-code flow) and as the
//! source of live-status and clip data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod helix;

pub use helix::HelixClient;

/// Clips returned when the caller does not ask for a count.
pub const DEFAULT_CLIP_COUNT: u8 = 3;
pub const MAX_CLIP_COUNT: u8 = 100;

/// The authenticated user as reported by the provider; trusted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwitchProfile {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested channel or broadcaster does not exist.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start a login.
    fn authorize_url(&self, state: &str) -> String;
    /// Trade an authorization code for the user's profile.
    async fn exchange_code(&self, code: &str) -> anyhow::Result<TwitchProfile>;
}

#[async_trait]
pub trait GameStatusGateway: Send + Sync {
    async fn stream_status(&self, channel: &str) -> Result<StreamStatus, GatewayError>;
    async fn recent_clips(&self, query: &ClipQuery) -> Result<ClipList, GatewayError>;
}

/// Who to fetch clips for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcaster {
    Id(String),
    Login(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipQuery {
    pub broadcaster: Broadcaster,
    pub first: u8,
}

impl ClipQuery {
    /// `first` is clamped to what Helix accepts.
    pub fn new(broadcaster: Broadcaster, first: Option<u32>) -> Self {
        let first = first
            .unwrap_or(u32::from(DEFAULT_CLIP_COUNT))
            .clamp(1, u32::from(MAX_CLIP_COUNT));
        ClipQuery {
            broadcaster,
            first: first as u8,
        }
    }
}

/// Channel profile plus the live stream, when there is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamStatus {
    pub channel: String,
    pub user_id: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    pub live: bool,
    pub title: Option<String>,
    pub game_name: Option<String>,
    pub viewer_count: Option<u64>,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub url: String,
    pub embed_url: String,
    pub title: String,
    pub creator_name: String,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub thumbnail_url: String,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipList {
    pub broadcaster_id: String,
    pub clips: Vec<Clip>,
}
