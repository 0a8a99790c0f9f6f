use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{new_token, SessionStore};

/// `session:<token>` → identity id, expiring after `ttl` seconds of inactivity.
pub struct RedisSessionStore {
    client: RedisClient,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn open(url: &str, ttl: u64) -> Result<Self> {
        let client = RedisClient::open(url).context("invalid REDIS_URL")?;
        Ok(RedisSessionStore { client, ttl })
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, twitch_id: &str) -> Result<String> {
        let token = new_token();
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("connecting to Redis")?;
        let _: () = conn
            .set_ex(Self::key(&token), twitch_id, self.ttl)
            .await
            .context("storing session")?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>> {
        let key = Self::key(token);
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("connecting to Redis")?;
        let id: Option<String> = conn.get(&key).await.context("reading session")?;
        if id.is_some() {
            let _: () = conn
                .expire(&key, self.ttl as i64)
                .await
                .context("refreshing session TTL")?;
        }
        Ok(id)
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("connecting to Redis")?;
        let _: () = conn
            .del(Self::key(token))
            .await
            .context("deleting session")?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("connecting to Redis")?;
        conn.ping::<String>().await.context("pinging Redis")?;
        Ok(())
    }
}
