use anyhow::Context as _;
use tracing::debug;

use roastrank_core::achievements::AuthorStats;
use roastrank_core::store::NewRoast;
use roastrank_utils::filter::{FilterLevel, filter_profanity};
use roastrank_utils::formatting::truncate_text;

use crate::{
    database::Database,
    impls::now_unix_secs,
    model::roast::{Roast, RoastWithAuthor},
};

const ROAST_COLUMNS: &str = "id, author_id, target_id, content, created_at, upvotes, downvotes, \
     is_hidden, is_flagged, parent_id";

const ROAST_WITH_AUTHOR_COLUMNS: &str = "r.id, r.author_id, r.target_id, r.content, r.created_at, \
     r.upvotes, r.downvotes, r.is_flagged, r.parent_id, \
     p.username AS author_username, p.avatar_url AS author_avatar_url, p.level AS author_level";

/// Insert a roast. Validation (length, trimming) happens in the core
/// submission flow before this is reached.
pub async fn create_roast(db: &Database, new_roast: &NewRoast) -> anyhow::Result<Roast> {
    let created_at = now_unix_secs();

    let roast: Roast = sqlx::query_as(&format!(
        "INSERT INTO roasts (author_id, target_id, content, created_at, parent_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {ROAST_COLUMNS}"
    ))
    .bind(new_roast.author_id)
    .bind(new_roast.target_id)
    .bind(new_roast.content.as_str())
    .bind(created_at)
    .bind(new_roast.parent_id)
    .fetch_one(db.pool())
    .await
    .context("failed to insert roast")?;

    debug!(
        roast_id = roast.id,
        author_id = roast.author_id,
        target_id = roast.target_id,
        preview = %truncate_text(&roast.content, 40),
        "roast stored"
    );

    Ok(roast)
}

/// Roasts aimed at a target, newest first, hidden ones excluded. When the
/// target has filter mode enabled, roast content is masked at the strict
/// level before it leaves this layer.
pub async fn roasts_for_target(
    db: &Database,
    target_id: i64,
) -> anyhow::Result<Vec<RoastWithAuthor>> {
    let filter_enabled: Option<bool> =
        sqlx::query_scalar("SELECT filter_mode_enabled FROM profiles WHERE id = $1")
            .bind(target_id)
            .fetch_optional(db.pool())
            .await?;
    let filter_enabled = filter_enabled.with_context(|| format!("profile {target_id} not found"))?;

    let mut roasts: Vec<RoastWithAuthor> = sqlx::query_as(&format!(
        "SELECT {ROAST_WITH_AUTHOR_COLUMNS}
         FROM roasts r
         JOIN profiles p ON p.id = r.author_id
         WHERE r.target_id = $1 AND NOT r.is_hidden
         ORDER BY r.created_at DESC"
    ))
    .bind(target_id)
    .fetch_all(db.pool())
    .await?;

    if filter_enabled {
        for roast in &mut roasts {
            roast.content = filter_profanity(&roast.content, FilterLevel::Strict);
        }
    }

    Ok(roasts)
}

/// Most-upvoted visible roasts across the site.
pub async fn top_roasts(db: &Database, limit: i64) -> anyhow::Result<Vec<RoastWithAuthor>> {
    let roasts = sqlx::query_as(&format!(
        "SELECT {ROAST_WITH_AUTHOR_COLUMNS}
         FROM roasts r
         JOIN profiles p ON p.id = r.author_id
         WHERE NOT r.is_hidden
         ORDER BY r.upvotes DESC, r.created_at DESC
         LIMIT $1"
    ))
    .bind(limit.clamp(1, 100))
    .fetch_all(db.pool())
    .await?;

    Ok(roasts)
}

/// Moderation switch: hide or unhide a roast. Returns whether a row changed.
pub async fn set_hidden(db: &Database, roast_id: i64, hidden: bool) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE roasts SET is_hidden = $2 WHERE id = $1")
        .bind(roast_id)
        .bind(hidden)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

/// Moderation switch: flag or unflag a roast for review.
pub async fn set_flagged(db: &Database, roast_id: i64, flagged: bool) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE roasts SET is_flagged = $2 WHERE id = $1")
        .bind(roast_id)
        .bind(flagged)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

#[derive(sqlx::FromRow)]
struct AuthorStatsRow {
    roasts_posted: i64,
    upvotes_received: i64,
    hot_roasts: i64,
}

/// Aggregate stats for achievement checks: authored roast count, upvotes
/// received across them, and the count of roasts with 10+ upvotes.
pub async fn author_stats(db: &Database, author_id: i64) -> anyhow::Result<AuthorStats> {
    let row: AuthorStatsRow = sqlx::query_as(
        "SELECT
            COUNT(*) AS roasts_posted,
            CAST(COALESCE(SUM(upvotes), 0) AS BIGINT) AS upvotes_received,
            COUNT(*) FILTER (WHERE upvotes >= 10) AS hot_roasts
         FROM roasts
         WHERE author_id = $1",
    )
    .bind(author_id)
    .fetch_one(db.pool())
    .await?;

    let level: Option<i64> = sqlx::query_scalar("SELECT level FROM profiles WHERE id = $1")
        .bind(author_id)
        .fetch_optional(db.pool())
        .await?;
    let level = level.with_context(|| format!("profile {author_id} not found"))?;

    Ok(AuthorStats {
        roasts_posted: row.roasts_posted,
        upvotes_received: row.upvotes_received,
        hot_roasts: row.hot_roasts,
        level,
    })
}
