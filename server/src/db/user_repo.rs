use anyhow::{Context, Result};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::db::{escape_like, LoginOutcome, NewLogin, User, UserFilter, UserRow};
use crate::kingdom::Kingdom;

#[derive(FromRow)]
struct LoginRow {
    #[sqlx(flatten)]
    user: UserRow,
    inserted: bool,
}

/// Fetch one user by identity id.
pub async fn find(db: &PgPool, twitch_id: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT twitch_id, display_name, profile_image_url, role, reino,
                  coins, wins, losses, buildings, troops_lost, created_at
             FROM users
            WHERE twitch_id = $1"#,
    )
    .bind(twitch_id)
    .fetch_optional(db)
    .await
    .context("fetching user")?;
    Ok(row.map(User::from))
}

/// Insert on first login; on conflict only the provider-owned fields move.
/// `xmax = 0` holds exactly for a freshly inserted tuple.
pub async fn record_login(db: &PgPool, login: &NewLogin) -> Result<LoginOutcome> {
    let row = sqlx::query_as::<_, LoginRow>(
        r#"
        INSERT INTO users (twitch_id, display_name, profile_image_url, role, coins)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (twitch_id) DO UPDATE
           SET display_name      = EXCLUDED.display_name,
               profile_image_url = EXCLUDED.profile_image_url
        RETURNING twitch_id, display_name, profile_image_url, role, reino,
                  coins, wins, losses, buildings, troops_lost, created_at,
                  (xmax = 0) AS inserted
        "#,
    )
    .bind(&login.twitch_id)
    .bind(&login.display_name)
    .bind(&login.profile_image_url)
    .bind(login.role.as_str())
    .bind(login.starting_coins)
    .fetch_one(db)
    .await
    .context("upserting user on login")?;

    Ok(LoginOutcome {
        user: row.user.into(),
        created: row.inserted,
    })
}

pub async fn set_kingdom(db: &PgPool, twitch_id: &str, kingdom: Option<Kingdom>) -> Result<bool> {
    let rows = sqlx::query("UPDATE users SET reino = $2 WHERE twitch_id = $1")
        .bind(twitch_id)
        .bind(kingdom.map(Kingdom::as_str))
        .execute(db)
        .await
        .context("updating kingdom")?
        .rows_affected();
    Ok(rows > 0)
}

/// Legions and activity go with the row (`ON DELETE CASCADE`).
pub async fn delete(db: &PgPool, twitch_id: &str) -> Result<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE twitch_id = $1")
        .bind(twitch_id)
        .execute(db)
        .await
        .context("deleting user")?
        .rows_affected();
    Ok(rows > 0)
}

/// The one WHERE clause shared by the count and the page query.
fn push_user_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(q) = filter.search() {
        qb.push(" WHERE (display_name ILIKE ")
            .push_bind(format!("%{}%", escape_like(q)))
            .push(" OR twitch_id = ")
            .push_bind(q.to_owned())
            .push(")");
    }
}

pub async fn count_matching(db: &PgPool, filter: &UserFilter) -> Result<i64> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
    push_user_filter(&mut qb, filter);
    qb.build_query_scalar::<i64>()
        .fetch_one(db)
        .await
        .context("counting users")
}

pub async fn list(db: &PgPool, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT twitch_id, display_name, profile_image_url, role, reino, \
                coins, wins, losses, buildings, troops_lost, created_at \
           FROM users",
    );
    push_user_filter(&mut qb, filter);
    qb.push(" ORDER BY display_name, twitch_id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = qb
        .build_query_as::<UserRow>()
        .fetch_all(db)
        .await
        .context("listing users")?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn count_all(db: &PgPool) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
        .context("counting users")
}

pub async fn count_kingdoms(db: &PgPool) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT reino) FROM users WHERE reino IS NOT NULL")
        .fetch_one(db)
        .await
        .context("counting kingdoms")
}
