use async_trait::async_trait;

use crate::error::StoreError;
use crate::vote::{VoteState, VoteTransition};

/// Persistence seam for votes. Implementations must keep the vote row and
/// the roast's counters consistent: `commit_vote` applies both in a single
/// transaction, and a uniqueness violation on (voter, roast) is reported as
/// `StoreError::Conflict` so the service layer can reconcile.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Current vote state for a (voter, roast) pair.
    async fn vote_for(&self, voter_id: i64, roast_id: i64) -> Result<VoteState, StoreError>;

    /// Persist one state-machine transition and its counter delta.
    async fn commit_vote(
        &self,
        voter_id: i64,
        roast_id: i64,
        transition: VoteTransition,
    ) -> Result<(), StoreError>;
}

/// Persistence seam for the XP award flow.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn xp_for(&self, user_id: i64) -> Result<i64, StoreError>;

    /// Persist XP and the level derived from it together.
    async fn set_xp_and_level(&self, user_id: i64, xp: i64, level: i64) -> Result<(), StoreError>;
}

/// Roast submission as the domain sees it, before validation.
#[derive(Clone, Debug)]
pub struct NewRoast {
    pub author_id: i64,
    pub target_id: i64,
    pub content: String,
    /// Parent roast when this is a threaded reply.
    pub parent_id: Option<i64>,
}

/// The slice of a stored roast the domain flows need back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredRoast {
    pub id: i64,
    pub author_id: i64,
    pub target_id: i64,
}

/// Persistence seam for roast submission.
#[async_trait]
pub trait RoastStore: Send + Sync {
    async fn insert_roast(&self, roast: NewRoast) -> Result<StoredRoast, StoreError>;
}
