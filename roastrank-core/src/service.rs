use tracing::{debug, warn};

use crate::error::{CoreError, StoreError};
use crate::leveling::level_for_xp;
use crate::store::{NewRoast, RoastStore, StoredRoast, UserStore, VoteStore};
use crate::vote::{VoteAction, VoteTransition, toggle};

/// XP awarded to the author when a roast is posted.
pub const ROAST_POSTED_XP: i64 = 10;
/// XP awarded to a roast's author when it receives a fresh upvote.
pub const UPVOTE_RECEIVED_XP: i64 = 5;
/// Maximum roast length in characters.
pub const MAX_ROAST_LEN: usize = 500;

/// Result of an XP award: the new totals plus whether a level boundary was
/// crossed, so callers can trigger level-up side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpAward {
    pub xp: i64,
    pub level: i64,
    pub leveled_up: bool,
}

/// Apply one vote action for a (voter, roast) pair.
///
/// Reads the current state, computes the toggle transition, and commits the
/// row change and counter delta through the store in one transaction. When
/// the commit loses a race to a concurrent vote (the store's uniqueness
/// constraint fires), the state is re-read and the commit retried exactly
/// once; a second conflict surfaces as `ConflictRetryExhausted`. Transient
/// store failures propagate untouched, with no retry.
pub async fn apply_vote<S>(
    store: &S,
    voter_id: i64,
    roast_id: i64,
    action: VoteAction,
) -> Result<VoteTransition, CoreError>
where
    S: VoteStore + ?Sized,
{
    let current = store
        .vote_for(voter_id, roast_id)
        .await
        .map_err(store_failure)?;
    let transition = toggle(current, action);

    match store.commit_vote(voter_id, roast_id, transition).await {
        Ok(()) => Ok(transition),
        Err(StoreError::Conflict) => {
            warn!(voter_id, roast_id, %action, "vote commit lost a race; re-reading state for one retry");

            let current = store
                .vote_for(voter_id, roast_id)
                .await
                .map_err(store_failure)?;
            let transition = toggle(current, action);

            match store.commit_vote(voter_id, roast_id, transition).await {
                Ok(()) => Ok(transition),
                Err(StoreError::Conflict) => Err(CoreError::ConflictRetryExhausted),
                Err(StoreError::Unavailable(source)) => Err(CoreError::StoreUnavailable(source)),
            }
        }
        Err(StoreError::Unavailable(source)) => Err(CoreError::StoreUnavailable(source)),
    }
}

/// Add XP to a user and persist the recomputed level alongside it.
pub async fn award_xp<S>(store: &S, user_id: i64, amount: i64) -> Result<XpAward, CoreError>
where
    S: UserStore + ?Sized,
{
    if amount < 0 {
        return Err(CoreError::InvalidArgument(format!(
            "xp award must be non-negative, got {amount}"
        )));
    }

    let current = store.xp_for(user_id).await.map_err(store_failure)?;
    let previous_level = level_for_xp(current)?;

    let xp = current.saturating_add(amount);
    let level = level_for_xp(xp)?;

    store
        .set_xp_and_level(user_id, xp, level)
        .await
        .map_err(store_failure)?;

    if level > previous_level {
        debug!(user_id, level, "user leveled up");
    }

    Ok(XpAward {
        xp,
        level,
        leveled_up: level > previous_level,
    })
}

/// Validate and persist a roast, then award the author their posting XP.
pub async fn submit_roast<R, U>(
    roasts: &R,
    users: &U,
    roast: NewRoast,
) -> Result<(StoredRoast, XpAward), CoreError>
where
    R: RoastStore + ?Sized,
    U: UserStore + ?Sized,
{
    let content = roast.content.trim();
    if content.is_empty() {
        return Err(CoreError::InvalidArgument(
            "roast content is empty".to_owned(),
        ));
    }
    if content.chars().count() > MAX_ROAST_LEN {
        return Err(CoreError::InvalidArgument(format!(
            "roast content exceeds {MAX_ROAST_LEN} characters"
        )));
    }

    let roast = NewRoast {
        content: content.to_owned(),
        ..roast
    };
    let stored = roasts.insert_roast(roast).await.map_err(store_failure)?;
    let award = award_xp(users, stored.author_id, ROAST_POSTED_XP).await?;

    Ok((stored, award))
}

fn store_failure(err: StoreError) -> CoreError {
    match err {
        // Conflicts are only meaningful on vote commits; anywhere else they
        // are just a failed store operation.
        StoreError::Conflict => {
            CoreError::StoreUnavailable(anyhow::anyhow!("unexpected conflict outside vote commit"))
        }
        StoreError::Unavailable(source) => CoreError::StoreUnavailable(source),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{
        MAX_ROAST_LEN, ROAST_POSTED_XP, apply_vote, award_xp, submit_roast,
    };
    use crate::error::{CoreError, StoreError};
    use crate::store::{NewRoast, RoastStore, StoredRoast, UserStore, VoteStore};
    use crate::vote::{VoteAction, VoteState, VoteTransition};

    #[derive(Default)]
    struct MemoryStore {
        votes: Mutex<HashMap<(i64, i64), VoteState>>,
        counters: Mutex<HashMap<i64, (i64, i64)>>,
        xp: Mutex<HashMap<i64, (i64, i64)>>,
        roasts: Mutex<Vec<NewRoast>>,
        conflicts_to_inject: Mutex<u32>,
        unavailable: Mutex<bool>,
    }

    impl MemoryStore {
        fn with_xp(user_id: i64, xp: i64) -> Self {
            let store = Self::default();
            store.xp.lock().unwrap().insert(user_id, (xp, 1));
            store
        }

        fn inject_conflicts(&self, count: u32) {
            *self.conflicts_to_inject.lock().unwrap() = count;
        }

        fn make_unavailable(&self) {
            *self.unavailable.lock().unwrap() = true;
        }

        /// Simulate a concurrent writer landing a vote between our read and
        /// commit.
        fn race_in_vote(&self, voter_id: i64, roast_id: i64, state: VoteState) {
            self.votes
                .lock()
                .unwrap()
                .insert((voter_id, roast_id), state);
        }

        fn counters_for(&self, roast_id: i64) -> (i64, i64) {
            self.counters
                .lock()
                .unwrap()
                .get(&roast_id)
                .copied()
                .unwrap_or((0, 0))
        }
    }

    #[async_trait]
    impl VoteStore for MemoryStore {
        async fn vote_for(&self, voter_id: i64, roast_id: i64) -> Result<VoteState, StoreError> {
            if *self.unavailable.lock().unwrap() {
                return Err(StoreError::Unavailable(anyhow::anyhow!("store offline")));
            }
            Ok(self
                .votes
                .lock()
                .unwrap()
                .get(&(voter_id, roast_id))
                .copied()
                .unwrap_or(VoteState::None))
        }

        async fn commit_vote(
            &self,
            voter_id: i64,
            roast_id: i64,
            transition: VoteTransition,
        ) -> Result<(), StoreError> {
            if *self.unavailable.lock().unwrap() {
                return Err(StoreError::Unavailable(anyhow::anyhow!("store offline")));
            }
            {
                let mut conflicts = self.conflicts_to_inject.lock().unwrap();
                if *conflicts > 0 {
                    *conflicts -= 1;
                    return Err(StoreError::Conflict);
                }
            }

            let mut votes = self.votes.lock().unwrap();
            match transition.next {
                VoteState::None => {
                    votes.remove(&(voter_id, roast_id));
                }
                state => {
                    votes.insert((voter_id, roast_id), state);
                }
            }

            let mut counters = self.counters.lock().unwrap();
            let entry = counters.entry(roast_id).or_insert((0, 0));
            entry.0 += transition.delta.upvotes;
            entry.1 += transition.delta.downvotes;
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn xp_for(&self, user_id: i64) -> Result<i64, StoreError> {
            self.xp
                .lock()
                .unwrap()
                .get(&user_id)
                .map(|(xp, _)| *xp)
                .ok_or_else(|| StoreError::Unavailable(anyhow::anyhow!("no such user")))
        }

        async fn set_xp_and_level(
            &self,
            user_id: i64,
            xp: i64,
            level: i64,
        ) -> Result<(), StoreError> {
            self.xp.lock().unwrap().insert(user_id, (xp, level));
            Ok(())
        }
    }

    #[async_trait]
    impl RoastStore for MemoryStore {
        async fn insert_roast(&self, roast: NewRoast) -> Result<StoredRoast, StoreError> {
            let mut roasts = self.roasts.lock().unwrap();
            let stored = StoredRoast {
                id: roasts.len() as i64 + 1,
                author_id: roast.author_id,
                target_id: roast.target_id,
            };
            roasts.push(roast);
            Ok(stored)
        }
    }

    fn new_roast(content: &str) -> NewRoast {
        NewRoast {
            author_id: 1,
            target_id: 2,
            content: content.to_owned(),
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn fresh_vote_then_toggle_off_nets_zero() {
        let store = MemoryStore::default();

        let first = apply_vote(&store, 7, 42, VoteAction::Upvote).await.unwrap();
        assert_eq!(first.next, VoteState::Upvoted);
        assert_eq!(store.counters_for(42), (1, 0));

        let second = apply_vote(&store, 7, 42, VoteAction::Upvote).await.unwrap();
        assert_eq!(second.next, VoteState::None);
        assert_eq!(store.counters_for(42), (0, 0));
    }

    #[tokio::test]
    async fn switching_vote_moves_both_counters() {
        let store = MemoryStore::default();

        apply_vote(&store, 7, 42, VoteAction::Upvote).await.unwrap();
        let switched = apply_vote(&store, 7, 42, VoteAction::Downvote)
            .await
            .unwrap();

        assert_eq!(switched.next, VoteState::Downvoted);
        assert_eq!(store.counters_for(42), (0, 1));
    }

    #[tokio::test]
    async fn conflict_is_retried_once_against_reread_state() {
        let store = MemoryStore::default();
        // A duplicate submission from the same user already landed its row;
        // our first commit hits the uniqueness conflict.
        store.inject_conflicts(1);
        store.race_in_vote(7, 42, VoteState::Upvoted);

        let transition = apply_vote(&store, 7, 42, VoteAction::Upvote).await.unwrap();

        // The retry reconciled against the landed upvote and toggled it off.
        assert_eq!(transition.previous, VoteState::Upvoted);
        assert_eq!(transition.next, VoteState::None);
    }

    #[tokio::test]
    async fn second_conflict_exhausts_the_retry() {
        let store = MemoryStore::default();
        store.inject_conflicts(2);

        let err = apply_vote(&store, 7, 42, VoteAction::Downvote)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ConflictRetryExhausted));
    }

    #[tokio::test]
    async fn store_outage_propagates_without_retry() {
        let store = MemoryStore::default();
        store.make_unavailable();

        let err = apply_vote(&store, 7, 42, VoteAction::Upvote)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn awarding_xp_recomputes_level() {
        let store = MemoryStore::with_xp(1, 0);

        let award = award_xp(&store, 1, 10).await.unwrap();
        assert_eq!(award.xp, 10);
        assert_eq!(award.level, 6);
        assert!(award.leveled_up);

        let again = award_xp(&store, 1, 0).await.unwrap();
        assert_eq!(again.xp, 10);
        assert!(!again.leveled_up);
    }

    #[tokio::test]
    async fn negative_award_is_rejected() {
        let store = MemoryStore::with_xp(1, 50);
        let err = award_xp(&store, 1, -5).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
        // Nothing was written.
        assert_eq!(store.xp.lock().unwrap()[&1], (50, 1));
    }

    #[tokio::test]
    async fn submitting_a_roast_awards_posting_xp() {
        let store = MemoryStore::with_xp(1, 0);

        let (stored, award) = submit_roast(&store, &store, new_roast("  nice haircut, did you lose a bet?  "))
            .await
            .unwrap();

        assert_eq!(stored.author_id, 1);
        assert_eq!(award.xp, ROAST_POSTED_XP);
        // Content was trimmed before storage.
        let roasts = store.roasts.lock().unwrap();
        assert_eq!(roasts[0].content, "nice haircut, did you lose a bet?");
    }

    #[tokio::test]
    async fn blank_and_oversized_roasts_are_rejected() {
        let store = MemoryStore::with_xp(1, 0);

        let err = submit_roast(&store, &store, new_roast("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        let long = "x".repeat(MAX_ROAST_LEN + 1);
        let err = submit_roast(&store, &store, new_roast(&long))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        assert!(store.roasts.lock().unwrap().is_empty());
    }
}
