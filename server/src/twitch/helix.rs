//! Reqwest-backed Twitch client.
//!
//! Every gateway call fetches a fresh app access token; nothing is cached
//! between requests and nothing is retried.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    Broadcaster, Clip, ClipList, ClipQuery, GameStatusGateway, GatewayError, IdentityProvider,
    StreamStatus, TwitchProfile,
};
use crate::config::TwitchConfig;

const AUTH_BASE: &str = "https://id.twitch.tv/oauth2";
const HELIX_BASE: &str = "https://api.twitch.tv/helix";
const LOGIN_SCOPE: &str = "user:read:email";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Helix wraps every result list in `{ "data": [...] }`.
#[derive(Deserialize)]
struct HelixPage<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct HelixUser {
    id: String,
    login: String,
    display_name: String,
    #[serde(default)]
    profile_image_url: String,
}

impl From<HelixUser> for TwitchProfile {
    fn from(u: HelixUser) -> Self {
        TwitchProfile {
            id: u.id,
            login: u.login,
            display_name: u.display_name,
            profile_image_url: Some(u.profile_image_url).filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Deserialize)]
struct HelixStream {
    title: String,
    game_name: String,
    viewer_count: u64,
    started_at: DateTime<Utc>,
}

/// An empty `data` list means the account does not exist.
fn first_user(users: Vec<HelixUser>, param: &str, value: &str) -> Result<TwitchProfile, GatewayError> {
    users
        .into_iter()
        .next()
        .map(TwitchProfile::from)
        .ok_or_else(|| GatewayError::NotFound(format!("twitch user {param}={value} not found")))
}

pub struct HelixClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_base: String,
    helix_base: String,
}

impl HelixClient {
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(cfg: &TwitchConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(cfg.timeout).build()?;
        Ok(HelixClient {
            http,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            redirect_uri: cfg.callback_url.clone(),
            auth_base: AUTH_BASE.into(),
            helix_base: HELIX_BASE.into(),
        })
    }

    /// Point the client at another OAuth and Helix host, e.g. a local fake.
    pub fn with_base_urls(mut self, auth_base: &str, helix_base: &str) -> Self {
        self.auth_base = auth_base.trim_end_matches('/').to_owned();
        self.helix_base = helix_base.trim_end_matches('/').to_owned();
        self
    }

    async fn token(&self, form: &[(&str, &str)]) -> anyhow::Result<String> {
        let res: TokenResponse = self
            .http
            .post(format!("{}/token", self.auth_base))
            .form(form)
            .send()
            .await
            .context("requesting access token")?
            .error_for_status()
            .context("access token rejected")?
            .json()
            .await
            .context("decoding access token")?;
        Ok(res.access_token)
    }

    /// Client-credentials token for public Helix reads.
    async fn app_token(&self) -> anyhow::Result<String> {
        self.token(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ])
        .await
    }

    async fn helix_get<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<Vec<T>> {
        let page: HelixPage<T> = self
            .http
            .get(format!("{}/{path}", self.helix_base))
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET helix/{path}"))?
            .error_for_status()
            .with_context(|| format!("helix/{path} returned an error status"))?
            .json()
            .await
            .with_context(|| format!("decoding helix/{path}"))?;
        Ok(page.data)
    }

    async fn lookup_user(
        &self,
        token: &str,
        by: &Broadcaster,
    ) -> Result<TwitchProfile, GatewayError> {
        let (param, value) = match by {
            Broadcaster::Id(id) => ("id", id.as_str()),
            Broadcaster::Login(login) => ("login", login.as_str()),
        };
        let users = self
            .helix_get::<HelixUser>(token, "users", &[(param, value)])
            .await?;
        first_user(users, param, value)
    }
}

#[async_trait]
impl IdentityProvider for HelixClient {
    fn authorize_url(&self, state: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", LOGIN_SCOPE)
            .append_pair("state", state)
            .finish();
        format!("{}/authorize?{query}", self.auth_base)
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<TwitchProfile> {
        let user_token = self
            .token(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        self.helix_get::<HelixUser>(&user_token, "users", &[])
            .await?
            .into_iter()
            .next()
            .map(TwitchProfile::from)
            .ok_or_else(|| anyhow!("helix/users returned no profile for the user token"))
    }
}

#[async_trait]
impl GameStatusGateway for HelixClient {
    async fn stream_status(&self, channel: &str) -> Result<StreamStatus, GatewayError> {
        let token = self.app_token().await?;
        let user = self
            .lookup_user(&token, &Broadcaster::Login(channel.to_owned()))
            .await?;
        let stream = self
            .helix_get::<HelixStream>(&token, "streams", &[("user_id", user.id.as_str())])
            .await?
            .into_iter()
            .next();

        Ok(StreamStatus {
            channel: user.login,
            user_id: user.id,
            display_name: user.display_name,
            profile_image_url: user.profile_image_url,
            live: stream.is_some(),
            title: stream.as_ref().map(|s| s.title.clone()),
            game_name: stream.as_ref().map(|s| s.game_name.clone()),
            viewer_count: stream.as_ref().map(|s| s.viewer_count),
            started_at: stream.as_ref().map(|s| s.started_at),
        })
    }

    async fn recent_clips(&self, query: &ClipQuery) -> Result<ClipList, GatewayError> {
        let token = self.app_token().await?;
        let user = self.lookup_user(&token, &query.broadcaster).await?;
        let first = query.first.to_string();
        let clips = self
            .helix_get::<Clip>(
                &token,
                "clips",
                &[("broadcaster_id", user.id.as_str()), ("first", first.as_str())],
            )
            .await?;
        Ok(ClipList {
            broadcaster_id: user.id,
            clips,
        })
    }
}
