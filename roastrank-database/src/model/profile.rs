use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user. `level` is a cache of `level_for_xp(xp)` and is
/// rewritten on every XP change.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: i64,
    pub level: i64,
    pub xp: i64,
    pub is_private: bool,
    pub filter_mode_enabled: bool,
    pub approve_roasts_first: bool,
}

/// Registration input.
#[derive(Debug, Clone, Copy)]
pub struct NewProfile<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: Option<bool>,
    pub filter_mode_enabled: Option<bool>,
    pub approve_roasts_first: Option<bool>,
}
