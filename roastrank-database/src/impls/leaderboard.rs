use roastrank_core::leaderboard::{LeaderboardCategory, LeaderboardEntry, ScoreRow, rank};

use crate::cache::leaderboard_cache_key;
use crate::database::Database;

#[derive(sqlx::FromRow)]
struct ScoreRowRecord {
    user_id: i64,
    username: String,
    avatar_url: Option<String>,
    level: i64,
    score: i64,
}

/// A ranked leaderboard page, served from cache when fresh enough.
/// Staleness is bounded by the cache TTL; the page is recomputed from the
/// live tables on every miss.
pub async fn leaderboard(
    db: &Database,
    category: LeaderboardCategory,
    limit: i64,
) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let limit = limit.clamp(1, 100);
    let cache = db.cache();
    let key = leaderboard_cache_key(cache, category, limit);

    cache
        .get_or_load_json(&key, cache.leaderboard_ttl(), || async {
            let rows = score_rows(db, category, limit).await?;
            Ok(rank(rows).collect())
        })
        .await
}

/// Metric rows for one category, pre-filtered the way the ranker expects:
/// private profiles and hidden roasts never contribute.
async fn score_rows(
    db: &Database,
    category: LeaderboardCategory,
    limit: i64,
) -> anyhow::Result<Vec<ScoreRow>> {
    let sql = match category {
        LeaderboardCategory::Roasters => {
            "SELECT id AS user_id, username, avatar_url, level, xp AS score
             FROM profiles
             WHERE NOT is_private
             ORDER BY xp DESC, username ASC
             LIMIT $1"
        }
        LeaderboardCategory::Roasted => {
            "SELECT p.id AS user_id, p.username, p.avatar_url, p.level, COUNT(r.id) AS score
             FROM profiles p
             JOIN roasts r ON r.target_id = p.id AND NOT r.is_hidden
             WHERE NOT p.is_private
             GROUP BY p.id, p.username, p.avatar_url, p.level
             ORDER BY score DESC, p.username ASC
             LIMIT $1"
        }
        LeaderboardCategory::Upvoted => {
            "SELECT p.id AS user_id, p.username, p.avatar_url, p.level,
                    CAST(COALESCE(SUM(r.upvotes), 0) AS BIGINT) AS score
             FROM profiles p
             JOIN roasts r ON r.author_id = p.id AND NOT r.is_hidden
             WHERE NOT p.is_private
             GROUP BY p.id, p.username, p.avatar_url, p.level
             ORDER BY score DESC, p.username ASC
             LIMIT $1"
        }
    };

    let records: Vec<ScoreRowRecord> = sqlx::query_as(sql)
        .bind(limit)
        .fetch_all(db.pool())
        .await?;

    Ok(records
        .into_iter()
        .map(|record| ScoreRow {
            user_id: record.user_id,
            username: record.username,
            avatar_url: record.avatar_url,
            level: record.level,
            score: record.score,
        })
        .collect())
}
