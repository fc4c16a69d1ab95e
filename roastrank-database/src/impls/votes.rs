use anyhow::Context as _;
use tracing::info;

use roastrank_core::error::{CoreError, StoreError};
use roastrank_core::service::{self, UPVOTE_RECEIVED_XP};
use roastrank_core::vote::{VoteAction, VoteState, VoteTransition};

use crate::{database::Database, impls::now_unix_secs};

/// Current vote state for a (voter, roast) pair.
pub async fn vote_for(db: &Database, voter_id: i64, roast_id: i64) -> anyhow::Result<VoteState> {
    let kind: Option<String> =
        sqlx::query_scalar("SELECT kind FROM votes WHERE voter_id = $1 AND roast_id = $2")
            .bind(voter_id)
            .bind(roast_id)
            .fetch_optional(db.pool())
            .await?;

    let action = kind
        .map(|raw| raw.parse::<VoteAction>())
        .transpose()
        .context("votes row holds an unknown kind")?;

    Ok(VoteState::from_action(action))
}

/// Persist one toggle transition: the vote row change and the roast counter
/// delta commit in a single transaction, so they can never diverge.
///
/// Races from concurrent submissions by the same voter surface as
/// `StoreError::Conflict`: a duplicate insert trips the (voter, roast)
/// uniqueness constraint, and an update or delete that matches zero rows
/// means the row no longer holds the state the transition was computed from.
pub async fn commit_vote(
    db: &Database,
    voter_id: i64,
    roast_id: i64,
    transition: VoteTransition,
) -> Result<(), StoreError> {
    let previous = transition.previous.as_action();
    let next = transition.next.as_action();

    let mut tx = db.pool().begin().await.map_err(unavailable)?;

    match (previous, next) {
        (None, Some(kind)) => {
            let inserted = sqlx::query(
                "INSERT INTO votes (voter_id, roast_id, kind, created_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (voter_id, roast_id) DO NOTHING",
            )
            .bind(voter_id)
            .bind(roast_id)
            .bind(kind.as_str())
            .bind(now_unix_secs())
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?
            .rows_affected();

            if inserted == 0 {
                return Err(StoreError::Conflict);
            }
        }
        (Some(kind), None) => {
            let deleted = sqlx::query(
                "DELETE FROM votes WHERE voter_id = $1 AND roast_id = $2 AND kind = $3",
            )
            .bind(voter_id)
            .bind(roast_id)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?
            .rows_affected();

            if deleted == 0 {
                return Err(StoreError::Conflict);
            }
        }
        (Some(from), Some(to)) if from != to => {
            let updated = sqlx::query(
                "UPDATE votes SET kind = $4 WHERE voter_id = $1 AND roast_id = $2 AND kind = $3",
            )
            .bind(voter_id)
            .bind(roast_id)
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?
            .rows_affected();

            if updated == 0 {
                return Err(StoreError::Conflict);
            }
        }
        // No row change and a zero delta; nothing to commit.
        _ => return Ok(()),
    }

    let counters_updated = sqlx::query(
        "UPDATE roasts SET upvotes = upvotes + $2, downvotes = downvotes + $3 WHERE id = $1",
    )
    .bind(roast_id)
    .bind(transition.delta.upvotes)
    .bind(transition.delta.downvotes)
    .execute(&mut *tx)
    .await
    .map_err(unavailable)?
    .rows_affected();

    if counters_updated == 0 {
        return Err(StoreError::Unavailable(anyhow::anyhow!(
            "roast {roast_id} not found for counter update"
        )));
    }

    tx.commit().await.map_err(unavailable)?;
    Ok(())
}

/// Apply a vote through the core toggle flow, then award the roast author
/// their upvote XP when the transition is a fresh upvote. Self-upvotes earn
/// nothing.
pub async fn vote_on_roast(
    db: &Database,
    voter_id: i64,
    roast_id: i64,
    action: VoteAction,
) -> Result<VoteTransition, CoreError> {
    let transition = service::apply_vote(db, voter_id, roast_id, action).await?;

    if transition.previous == VoteState::None && transition.next == VoteState::Upvoted {
        let author_id: Option<i64> = sqlx::query_scalar("SELECT author_id FROM roasts WHERE id = $1")
            .bind(roast_id)
            .fetch_optional(db.pool())
            .await
            .map_err(|e| CoreError::StoreUnavailable(e.into()))?;

        if let Some(author_id) = author_id {
            if author_id != voter_id {
                service::award_xp(db, author_id, UPVOTE_RECEIVED_XP).await?;
            }
        }
    }

    Ok(transition)
}

/// Re-derive every roast's counters from its vote rows, repairing any drift
/// left by interrupted transactions or manual edits. Returns the number of
/// rows corrected.
pub async fn recount_roast_counters(db: &Database) -> anyhow::Result<u64> {
    let mut tx = db.pool().begin().await?;

    let recounted = sqlx::query(
        "UPDATE roasts r
         SET upvotes = tallies.up, downvotes = tallies.down
         FROM (
             SELECT roast_id,
                    COUNT(*) FILTER (WHERE kind = 'upvote') AS up,
                    COUNT(*) FILTER (WHERE kind = 'downvote') AS down
             FROM votes
             GROUP BY roast_id
         ) tallies
         WHERE r.id = tallies.roast_id
           AND (r.upvotes <> tallies.up OR r.downvotes <> tallies.down)",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let zeroed = sqlx::query(
        "UPDATE roasts SET upvotes = 0, downvotes = 0
         WHERE id NOT IN (SELECT roast_id FROM votes)
           AND (upvotes <> 0 OR downvotes <> 0)",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    let repaired = recounted + zeroed;
    if repaired > 0 {
        info!(repaired, "roast counters re-derived from vote rows");
    }

    Ok(repaired)
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.into())
}
