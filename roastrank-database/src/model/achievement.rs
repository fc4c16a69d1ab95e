use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One unlocked achievement row; the definition itself lives in the
/// roastrank-core catalog.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub user_id: i64,
    pub achievement_id: String,
    pub unlocked_at: i64,
}
