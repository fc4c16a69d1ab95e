//! `Database` as the store implementation the roastrank-core flows run
//! against, delegating to the query modules in `impls`.

use async_trait::async_trait;

use roastrank_core::error::StoreError;
use roastrank_core::store::{NewRoast, RoastStore, StoredRoast, UserStore, VoteStore};
use roastrank_core::vote::{VoteState, VoteTransition};

use crate::database::Database;
use crate::impls;

#[async_trait]
impl VoteStore for Database {
    async fn vote_for(&self, voter_id: i64, roast_id: i64) -> Result<VoteState, StoreError> {
        impls::votes::vote_for(self, voter_id, roast_id)
            .await
            .map_err(StoreError::Unavailable)
    }

    async fn commit_vote(
        &self,
        voter_id: i64,
        roast_id: i64,
        transition: VoteTransition,
    ) -> Result<(), StoreError> {
        impls::votes::commit_vote(self, voter_id, roast_id, transition).await
    }
}

#[async_trait]
impl UserStore for Database {
    async fn xp_for(&self, user_id: i64) -> Result<i64, StoreError> {
        impls::users::xp_for(self, user_id)
            .await
            .map_err(StoreError::Unavailable)
    }

    async fn set_xp_and_level(&self, user_id: i64, xp: i64, level: i64) -> Result<(), StoreError> {
        impls::users::set_xp_and_level(self, user_id, xp, level)
            .await
            .map_err(StoreError::Unavailable)
    }
}

#[async_trait]
impl RoastStore for Database {
    async fn insert_roast(&self, roast: NewRoast) -> Result<StoredRoast, StoreError> {
        let stored = impls::roasts::create_roast(self, &roast)
            .await
            .map_err(StoreError::Unavailable)?;

        Ok(StoredRoast {
            id: stored.id,
            author_id: stored.author_id,
            target_id: stored.target_id,
        })
    }
}
