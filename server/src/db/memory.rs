//! In-process `GameStore` backed by `DashMap`s. Used by the integration tests;
//! mirrors the Postgres semantics including cascade deletes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::db::{
    ActivityEntry, GameStore, LegionEntry, LoginOutcome, NewLogin, NewsItem, User, UserFilter,
};
use crate::kingdom::{Kingdom, TroopType};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    legions: DashMap<String, Vec<LegionEntry>>,
    activity: DashMap<String, Vec<ActivityEntry>>,
    news: DashMap<i64, NewsItem>,
    next_news_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user row as-is.
    pub fn put_user(&self, user: User) {
        self.users.insert(user.twitch_id.clone(), user);
    }

    /// Add units to a legion, creating the entry if needed.
    pub fn add_troops(&self, twitch_id: &str, troop_type: TroopType, quantity: i32) {
        let mut legion = self.legions.entry(twitch_id.to_owned()).or_default();
        match legion.iter_mut().find(|e| e.troop_type == troop_type) {
            Some(entry) => entry.quantity += quantity,
            None => legion.push(LegionEntry {
                troop_type,
                quantity,
            }),
        }
    }

    /// Append to a user's activity log.
    pub fn push_activity(&self, twitch_id: &str, entry: ActivityEntry) {
        self.activity
            .entry(twitch_id.to_owned())
            .or_default()
            .push(entry);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user(&self, twitch_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(twitch_id).map(|u| u.value().clone()))
    }

    async fn record_login(&self, login: &NewLogin) -> Result<LoginOutcome> {
        let mut created = false;
        let mut user = self
            .users
            .entry(login.twitch_id.clone())
            .or_insert_with(|| {
                created = true;
                User {
                    twitch_id: login.twitch_id.clone(),
                    display_name: login.display_name.clone(),
                    profile_image_url: login.profile_image_url.clone(),
                    role: login.role,
                    kingdom: None,
                    coins: login.starting_coins,
                    wins: 0,
                    losses: 0,
                    buildings: 0,
                    troops_lost: 0,
                    created_at: Utc::now(),
                }
            });
        user.display_name = login.display_name.clone();
        user.profile_image_url = login.profile_image_url.clone();
        Ok(LoginOutcome {
            user: user.value().clone(),
            created,
        })
    }

    async fn set_kingdom(&self, twitch_id: &str, kingdom: Option<Kingdom>) -> Result<bool> {
        Ok(match self.users.get_mut(twitch_id) {
            Some(mut user) => {
                user.kingdom = kingdom;
                true
            }
            None => false,
        })
    }

    async fn delete_user(&self, twitch_id: &str) -> Result<bool> {
        let removed = self.users.remove(twitch_id).is_some();
        if removed {
            self.legions.remove(twitch_id);
            self.activity.remove(twitch_id);
        }
        Ok(removed)
    }

    async fn count_users_matching(&self, filter: &UserFilter) -> Result<i64> {
        Ok(self.users.iter().filter(|u| filter.matches(u.value())).count() as i64)
    }

    async fn list_users(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| filter.matches(u.value()))
            .map(|u| u.value().clone())
            .collect();
        users.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.twitch_id.cmp(&b.twitch_id))
        });
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn legion(&self, twitch_id: &str) -> Result<Vec<LegionEntry>> {
        let mut entries = self
            .legions
            .get(twitch_id)
            .map(|l| l.value().clone())
            .unwrap_or_default();
        entries.sort_by_key(|e| e.troop_type.as_str());
        Ok(entries)
    }

    async fn recent_activity(&self, twitch_id: &str, limit: i64) -> Result<Vec<ActivityEntry>> {
        let mut entries = self
            .activity
            .get(twitch_id)
            .map(|a| a.value().clone())
            .unwrap_or_default();
        // Newest first; stable sort keeps later pushes ahead on equal timestamps.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItem>> {
        let mut items: Vec<NewsItem> = self.news.iter().map(|n| n.value().clone()).collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn create_news(&self, title: &str, summary: &str) -> Result<NewsItem> {
        let id = self.next_news_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = NewsItem {
            id,
            title: title.to_owned(),
            summary: summary.to_owned(),
            created_at: Utc::now(),
        };
        self.news.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_news(&self, id: i64) -> Result<bool> {
        Ok(self.news.remove(&id).is_some())
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.users.len() as i64)
    }

    async fn count_kingdoms(&self) -> Result<i64> {
        let held: HashSet<Kingdom> = self.users.iter().filter_map(|u| u.kingdom).collect();
        Ok(held.len() as i64)
    }

    async fn count_legion_units(&self) -> Result<i64> {
        Ok(self
            .legions
            .iter()
            .flat_map(|l| l.value().iter().map(|e| i64::from(e.quantity)).collect::<Vec<_>>())
            .sum())
    }
}
