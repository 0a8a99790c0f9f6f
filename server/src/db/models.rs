use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::kingdom::{Kingdom, TroopType};

/// The single capability representation read by both access gates.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

/// A player, keyed by the identity provider's user id.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct User {
    pub twitch_id: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    pub role: Role,
    #[serde(rename = "reino")]
    pub kingdom: Option<Kingdom>,
    pub coins: i64,
    pub wins: i32,
    pub losses: i32,
    pub buildings: i32,
    pub troops_lost: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn stats(&self) -> UserStats {
        UserStats {
            wins: self.wins,
            losses: self.losses,
            buildings: self.buildings,
            troops_lost: self.troops_lost,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub wins: i32,
    pub losses: i32,
    pub buildings: i32,
    pub troops_lost: i32,
}

/// What a successful login writes.
#[derive(Debug, Clone)]
pub struct NewLogin {
    pub twitch_id: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    /// Only applied when the row is created.
    pub role: Role,
    /// Only applied when the row is created.
    pub starting_coins: i64,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub created: bool,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct LegionEntry {
    pub troop_type: TroopType,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, PartialEq, FromRow)]
pub struct NewsItem {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumen")]
    pub summary: String,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

//////////////////////////////////////////////////
// Raw rows
//////////////////////////////////////////////////

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub twitch_id: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    pub role: String,
    pub reino: Option<String>,
    pub coins: i64,
    pub wins: i32,
    pub losses: i32,
    pub buildings: i32,
    pub troops_lost: i32,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role.parse().unwrap_or_else(|e| {
            log::warn!("user {}: {e}; treating as plain user", row.twitch_id);
            Role::User
        });
        let kingdom = row.reino.as_deref().and_then(|raw| match raw.parse::<Kingdom>() {
            Ok(k) => Some(k),
            Err(e) => {
                log::warn!("user {}: {e}; ignoring stored kingdom", row.twitch_id);
                None
            }
        });
        User {
            twitch_id: row.twitch_id,
            display_name: row.display_name,
            profile_image_url: row.profile_image_url,
            role,
            kingdom,
            coins: row.coins,
            wins: row.wins,
            losses: row.losses,
            buildings: row.buildings,
            troops_lost: row.troops_lost,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct LegionRow {
    pub troop_type: String,
    pub quantity: i32,
}

#[derive(Debug, FromRow)]
pub struct ActivityRow {
    pub kind: String,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityEntry {
    fn from(row: ActivityRow) -> Self {
        ActivityEntry {
            kind: row.kind,
            amount: row.amount,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
