use tracing::info;

use roastrank_core::achievements::{Achievement, by_id, check_unlocks};
use roastrank_core::error::CoreError;
use roastrank_core::service::award_xp;

use crate::{
    database::Database, impls::now_unix_secs, model::achievement::UnlockedAchievement,
};

/// Achievements a user has unlocked, oldest first.
pub async fn unlocked_achievements(
    db: &Database,
    user_id: i64,
) -> anyhow::Result<Vec<UnlockedAchievement>> {
    let unlocked = sqlx::query_as(
        "SELECT user_id, achievement_id, unlocked_at
         FROM achievements
         WHERE user_id = $1
         ORDER BY unlocked_at ASC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(unlocked)
}

/// Unlock one achievement and award its XP reward. Idempotent: a repeat
/// unlock is a no-op and awards nothing. Returns whether it was new.
pub async fn unlock(db: &Database, user_id: i64, achievement_id: &str) -> Result<bool, CoreError> {
    let Some(achievement) = by_id(achievement_id) else {
        return Err(CoreError::InvalidArgument(format!(
            "unknown achievement `{achievement_id}`"
        )));
    };

    let inserted = sqlx::query(
        "INSERT INTO achievements (user_id, achievement_id, unlocked_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, achievement_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(achievement.id)
    .bind(now_unix_secs())
    .execute(db.pool())
    .await
    .map_err(|e| CoreError::StoreUnavailable(e.into()))?
    .rows_affected();

    if inserted == 0 {
        return Ok(false);
    }

    award_xp(db, user_id, achievement.xp_reward).await?;
    info!(user_id, achievement_id = achievement.id, "achievement unlocked");

    Ok(true)
}

/// Evaluate the stat-derived achievements for a user and unlock anything
/// newly earned. Event-driven achievements (weekly champion, battle winner)
/// go through `unlock` directly from their own flows.
pub async fn sync_stat_achievements(
    db: &Database,
    user_id: i64,
) -> Result<Vec<&'static Achievement>, CoreError> {
    let stats = crate::impls::roasts::author_stats(db, user_id)
        .await
        .map_err(CoreError::StoreUnavailable)?;

    let mut newly_unlocked = Vec::new();
    for achievement in check_unlocks(&stats) {
        if unlock(db, user_id, achievement.id).await? {
            newly_unlocked.push(achievement);
        }
    }

    Ok(newly_unlocked)
}
