use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::db::{
    legion_repo, news_repo, user_repo, ActivityEntry, GameStore, LegionEntry, LoginOutcome,
    NewLogin, NewsItem, User, UserFilter,
};
use crate::kingdom::Kingdom;

/// `GameStore` over a bounded Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
            .context("connecting to Postgres")?;
        Ok(PgStore::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl GameStore for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("pinging Postgres")?;
        Ok(())
    }

    async fn find_user(&self, twitch_id: &str) -> Result<Option<User>> {
        user_repo::find(&self.pool, twitch_id).await
    }

    async fn record_login(&self, login: &NewLogin) -> Result<LoginOutcome> {
        user_repo::record_login(&self.pool, login).await
    }

    async fn set_kingdom(&self, twitch_id: &str, kingdom: Option<Kingdom>) -> Result<bool> {
        user_repo::set_kingdom(&self.pool, twitch_id, kingdom).await
    }

    async fn delete_user(&self, twitch_id: &str) -> Result<bool> {
        user_repo::delete(&self.pool, twitch_id).await
    }

    async fn count_users_matching(&self, filter: &UserFilter) -> Result<i64> {
        user_repo::count_matching(&self.pool, filter).await
    }

    async fn list_users(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>> {
        user_repo::list(&self.pool, filter, limit, offset).await
    }

    async fn legion(&self, twitch_id: &str) -> Result<Vec<LegionEntry>> {
        legion_repo::legion(&self.pool, twitch_id).await
    }

    async fn recent_activity(&self, twitch_id: &str, limit: i64) -> Result<Vec<ActivityEntry>> {
        legion_repo::recent_activity(&self.pool, twitch_id, limit).await
    }

    async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItem>> {
        news_repo::latest(&self.pool, limit).await
    }

    async fn create_news(&self, title: &str, summary: &str) -> Result<NewsItem> {
        news_repo::create(&self.pool, title, summary).await
    }

    async fn delete_news(&self, id: i64) -> Result<bool> {
        news_repo::delete(&self.pool, id).await
    }

    async fn count_users(&self) -> Result<i64> {
        user_repo::count_all(&self.pool).await
    }

    async fn count_kingdoms(&self) -> Result<i64> {
        user_repo::count_kingdoms(&self.pool).await
    }

    async fn count_legion_units(&self) -> Result<i64> {
        legion_repo::count_units(&self.pool).await
    }
}
