//! Persistence: domain models, the `GameStore` seam, and its Postgres and
//! in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::kingdom::Kingdom;

pub mod legion_repo;
pub mod memory;
pub mod models;
pub mod news_repo;
pub mod pg;
pub mod user_repo;

pub use memory::MemoryStore;
pub use models::*;
pub use pg::PgStore;

/// Users per page in the admin listing.
pub const USERS_PAGE_SIZE: i64 = 10;
/// Rows returned by the activity feed.
pub const ACTIVITY_LIMIT: i64 = 10;
/// Items returned by the news feed.
pub const NEWS_LIMIT: i64 = 20;

/// Every query a route handler may run.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    // ----- users -----
    async fn find_user(&self, twitch_id: &str) -> Result<Option<User>>;
    /// Create the user on first login, otherwise refresh name and image only.
    async fn record_login(&self, login: &NewLogin) -> Result<LoginOutcome>;
    /// Returns false when no such user exists.
    async fn set_kingdom(&self, twitch_id: &str, kingdom: Option<Kingdom>) -> Result<bool>;
    /// Returns false when no such user exists.
    async fn delete_user(&self, twitch_id: &str) -> Result<bool>;
    async fn count_users_matching(&self, filter: &UserFilter) -> Result<i64>;
    async fn list_users(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>>;

    // ----- game state -----
    async fn legion(&self, twitch_id: &str) -> Result<Vec<LegionEntry>>;
    async fn recent_activity(&self, twitch_id: &str, limit: i64) -> Result<Vec<ActivityEntry>>;

    // ----- news -----
    async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItem>>;
    async fn create_news(&self, title: &str, summary: &str) -> Result<NewsItem>;
    /// Returns false when no such item exists.
    async fn delete_news(&self, id: i64) -> Result<bool>;

    // ----- admin dashboard -----
    async fn count_users(&self) -> Result<i64>;
    /// Distinct kingdoms held by at least one user.
    async fn count_kingdoms(&self) -> Result<i64>;
    /// Total troop units across every legion.
    async fn count_legion_units(&self) -> Result<i64>;
}

/// Admin search: substring of display name OR exact identity id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    search: Option<String>,
}

impl UserFilter {
    pub fn new(raw: Option<&str>) -> Self {
        UserFilter {
            search: raw
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// In-process twin of the SQL predicate in `user_repo::push_user_filter`.
    pub fn matches(&self, user: &User) -> bool {
        match &self.search {
            None => true,
            Some(q) => {
                user.twitch_id == *q
                    || user
                        .display_name
                        .to_lowercase()
                        .contains(&q.to_lowercase())
            }
        }
    }
}

/// One page of the admin user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// 1-based; anything below 1 reads as the first page.
    pub fn new(page: Option<i64>, size: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        PageWindow {
            page,
            limit: size,
            offset: (page - 1).saturating_mul(size),
        }
    }
}

pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + size - 1) / size
    }
}

/// Escape `%`, `_` and `\` for use inside a LIKE pattern.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
