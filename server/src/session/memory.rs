use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::{new_token, SessionStore};

/// Single-process session store, used when no `REDIS_URL` is configured.
pub struct MemorySessionStore {
    sessions: DashMap<String, (String, Instant)>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        MemorySessionStore {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session whose browser never came back.
    fn sweep(&self, now: Instant) {
        self.sessions.retain(|_, (_, expires)| *expires > now);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, twitch_id: &str) -> Result<String> {
        let token = new_token();
        let now = Instant::now();
        self.sweep(now);
        self.sessions
            .insert(token.clone(), (twitch_id.to_owned(), now + self.ttl));
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let live = match self.sessions.get_mut(token) {
            Some(mut entry) if entry.1 > now => {
                entry.1 = now + self.ttl;
                Some(entry.0.clone())
            }
            Some(_) => None,
            None => return Ok(None),
        };
        if live.is_none() {
            self.sessions.remove(token);
        }
        Ok(live)
    }

    async fn destroy(&self, token: &str) -> Result<()> {
        self.sessions.remove(token);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
