use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::NewsItem;

pub async fn latest(db: &PgPool, limit: i64) -> Result<Vec<NewsItem>> {
    sqlx::query_as::<_, NewsItem>(
        r#"SELECT id, title, summary, created_at
             FROM news
            ORDER BY created_at DESC, id DESC
            LIMIT $1"#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("fetching news")
}

pub async fn create(db: &PgPool, title: &str, summary: &str) -> Result<NewsItem> {
    sqlx::query_as::<_, NewsItem>(
        r#"INSERT INTO news (title, summary)
           VALUES ($1, $2)
           RETURNING id, title, summary, created_at"#,
    )
    .bind(title)
    .bind(summary)
    .fetch_one(db)
    .await
    .context("inserting news")
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool> {
    let rows = sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("deleting news")?
        .rows_affected();
    Ok(rows > 0)
}
