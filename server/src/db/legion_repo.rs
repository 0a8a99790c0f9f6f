//! Per-user legions and the read-only activity log.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::{ActivityEntry, ActivityRow, LegionEntry, LegionRow};
use crate::kingdom::TroopType;

/// Rows naming a troop type outside the catalog are skipped.
pub async fn legion(db: &PgPool, twitch_id: &str) -> Result<Vec<LegionEntry>> {
    let rows = sqlx::query_as::<_, LegionRow>(
        r#"SELECT troop_type, quantity
             FROM legions
            WHERE twitch_id = $1
            ORDER BY troop_type"#,
    )
    .bind(twitch_id)
    .fetch_all(db)
    .await
    .context("fetching legion")?;

    Ok(rows
        .into_iter()
        .filter_map(|r| match r.troop_type.parse::<TroopType>() {
            Ok(troop_type) => Some(LegionEntry {
                troop_type,
                quantity: r.quantity,
            }),
            Err(e) => {
                log::warn!("user {twitch_id}: skipping legion row, {e}");
                None
            }
        })
        .collect())
}

pub async fn recent_activity(db: &PgPool, twitch_id: &str, limit: i64) -> Result<Vec<ActivityEntry>> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"SELECT kind, amount, description, created_at
             FROM activity
            WHERE twitch_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2"#,
    )
    .bind(twitch_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("fetching activity")?;
    Ok(rows.into_iter().map(ActivityEntry::from).collect())
}

pub async fn count_units(db: &PgPool) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM legions")
        .fetch_one(db)
        .await
        .context("summing legion units")
}
