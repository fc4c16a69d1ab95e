pub mod achievements;
pub mod leaderboard;
pub mod roasts;
pub mod users;
pub mod votes;

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs() as i64)
}
