//! Maintenance entrypoint: runs migrations, re-derives roast vote counters
//! from the vote rows, and warms the leaderboard caches. Intended to run at
//! deploy time and on a schedule.

use std::env;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sqlx::postgres::PgPoolOptions;

use roastrank_core::leaderboard::LeaderboardCategory;
use roastrank_database::cache::DEFAULT_LEADERBOARD_CACHE_TTL;
use roastrank_database::{CacheService, Database, MIGRATOR, impls};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !metadata.target().starts_with("sqlx::query")
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    // Load the .env file
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")?;

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "roastrank:prod".to_string());

    let mut cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    let leaderboard_ttl_seconds = env_u64(
        "LEADERBOARD_CACHE_TTL_SECONDS",
        DEFAULT_LEADERBOARD_CACHE_TTL.as_secs(),
    );
    cache.configure_leaderboard_ttl(Duration::from_secs(leaderboard_ttl_seconds));
    info!(
        leaderboard_ttl_seconds = cache.leaderboard_ttl().as_secs(),
        "Leaderboard cache TTL configured."
    );

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let repaired = impls::votes::recount_roast_counters(&db).await?;
    if repaired == 0 {
        info!("Roast counters already consistent with vote rows.");
    }

    if env_bool("WARM_LEADERBOARDS", true) {
        for category in LeaderboardCategory::ALL {
            let entries = impls::leaderboard::leaderboard(&db, category, 20).await?;
            info!(%category, entries = entries.len(), "Leaderboard cache warmed.");
        }
    } else {
        info!("Leaderboard warmup disabled (set WARM_LEADERBOARDS=true to enable).");
    }

    Ok(())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}
