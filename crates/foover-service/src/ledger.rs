//! Vote Ledger: one score per `(session, product)` pair.

use std::sync::Arc;

use foover_core::{
  product::ProductId,
  session::SessionToken,
  store::VoteStore,
  vote::{Score, Vote},
};

use crate::{Result, ServiceError};

pub struct VoteLedger<S> {
  store: Arc<S>,
}

impl<S: VoteStore> VoteLedger<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Upsert the vote for the pair. Out-of-range scores never reach the store.
  pub async fn save_vote(
    &self,
    token: &SessionToken,
    product_id: &ProductId,
    score: i64,
  ) -> Result<()> {
    let score = Score::new(score)?;
    self
      .store
      .save_vote(token, product_id, score)
      .await
      .map_err(ServiceError::store)
  }

  pub async fn get_votes_by_session(&self, token: &SessionToken) -> Result<Vec<Vote>> {
    self
      .store
      .get_votes_by_session(token)
      .await
      .map_err(ServiceError::store)
  }
}
