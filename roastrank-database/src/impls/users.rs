use anyhow::Context as _;

use crate::{
    database::Database,
    impls::now_unix_secs,
    model::profile::{NewProfile, Profile, ProfileUpdate},
};

const PROFILE_COLUMNS: &str = "id, username, email, bio, avatar_url, created_at, level, xp, \
     is_private, filter_mode_enabled, approve_roasts_first";

/// Register a profile. Usernames are unique; a taken name surfaces as the
/// constraint error.
pub async fn create_profile(db: &Database, new_profile: NewProfile<'_>) -> anyhow::Result<Profile> {
    let created_at = now_unix_secs();

    let profile: Profile = sqlx::query_as(&format!(
        "INSERT INTO profiles (username, email, bio, avatar_url, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(new_profile.username)
    .bind(new_profile.email)
    .bind(new_profile.bio)
    .bind(new_profile.avatar_url)
    .bind(created_at)
    .fetch_one(db.pool())
    .await
    .context("failed to insert profile")?;

    Ok(profile)
}

pub async fn profile_by_id(db: &Database, user_id: i64) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(profile)
}

pub async fn profile_by_username(db: &Database, username: &str) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(db.pool())
    .await?;

    Ok(profile)
}

/// Newest public profiles, for the discover feed. Private profiles are
/// never served here.
pub async fn recent_public_profiles(db: &Database, limit: i64) -> anyhow::Result<Vec<Profile>> {
    let profiles = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles
         WHERE NOT is_private
         ORDER BY created_at DESC
         LIMIT $1"
    ))
    .bind(limit.clamp(1, 100))
    .fetch_all(db.pool())
    .await?;

    Ok(profiles)
}

/// Apply the set fields of `update`, returning the fresh row, or `None`
/// when the profile does not exist.
pub async fn update_profile(
    db: &Database,
    user_id: i64,
    update: &ProfileUpdate,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as(&format!(
        "UPDATE profiles SET
            username = COALESCE($2, username),
            bio = COALESCE($3, bio),
            avatar_url = COALESCE($4, avatar_url),
            is_private = COALESCE($5, is_private),
            filter_mode_enabled = COALESCE($6, filter_mode_enabled),
            approve_roasts_first = COALESCE($7, approve_roasts_first)
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(update.username.as_deref())
    .bind(update.bio.as_deref())
    .bind(update.avatar_url.as_deref())
    .bind(update.is_private)
    .bind(update.filter_mode_enabled)
    .bind(update.approve_roasts_first)
    .fetch_optional(db.pool())
    .await
    .context("failed to update profile")?;

    Ok(profile)
}

pub async fn xp_for(db: &Database, user_id: i64) -> anyhow::Result<i64> {
    let xp: Option<i64> = sqlx::query_scalar("SELECT xp FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?;

    xp.with_context(|| format!("profile {user_id} not found"))
}

/// Persist an XP total and its derived level in one statement so they can
/// never be observed out of step.
pub async fn set_xp_and_level(
    db: &Database,
    user_id: i64,
    xp: i64,
    level: i64,
) -> anyhow::Result<()> {
    let updated = sqlx::query("UPDATE profiles SET xp = $2, level = $3 WHERE id = $1")
        .bind(user_id)
        .bind(xp)
        .bind(level)
        .execute(db.pool())
        .await?
        .rows_affected();

    anyhow::ensure!(updated == 1, "profile {user_id} not found");
    Ok(())
}
