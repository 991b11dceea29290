//! Aggregator: per-product mean score and vote count, computed on read.
//!
//! Products nobody voted for are absent; the result is a function of the
//! votes alone, not of the catalog.

use std::sync::Arc;

use foover_core::{store::VoteStore, vote::ProductScore};

use crate::{Result, ServiceError};

pub struct Aggregator<S> {
  store: Arc<S>,
}

impl<S: VoteStore> Aggregator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn get_aggregated_scores(&self) -> Result<Vec<ProductScore>> {
    self
      .store
      .get_aggregated_scores()
      .await
      .map_err(ServiceError::store)
  }
}
