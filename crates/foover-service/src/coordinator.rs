//! [`Coordinator`] — the entry point the transport layer talks to.
//!
//! A vote is checked in a fixed order: request shape and score, then session,
//! then product. The first failing check is reported and nothing is written.
//! Uniqueness of the stored vote is the store's job, not ours, so the order
//! only affects which error a caller sees.

use std::sync::Arc;

use foover_core::{
  product::{Product, ProductId},
  session::SessionToken,
  store::VoteStore,
  vote::{ProductScore, Vote},
};

use crate::{
  Result, ServiceError,
  aggregate::Aggregator,
  catalog::{CatalogSource, CatalogSync},
  ledger::VoteLedger,
  sessions::SessionRegistry,
  validate::{ScorePolicy, VoteRequest, VoteValidator},
};

pub struct Coordinator<S> {
  store:      Arc<S>,
  sessions:   SessionRegistry<S>,
  catalog:    CatalogSync<S>,
  ledger:     VoteLedger<S>,
  aggregator: Aggregator<S>,
  validator:  Box<dyn VoteValidator>,
}

impl<S: VoteStore> Coordinator<S> {
  /// Build a coordinator with the default [`ScorePolicy`].
  pub fn new(store: Arc<S>) -> Self {
    Self::with_validator(store, Box::new(ScorePolicy::default()))
  }

  pub fn with_validator(store: Arc<S>, validator: Box<dyn VoteValidator>) -> Self {
    Self {
      sessions: SessionRegistry::new(store.clone()),
      catalog: CatalogSync::new(store.clone()),
      ledger: VoteLedger::new(store.clone()),
      aggregator: Aggregator::new(store.clone()),
      store,
      validator,
    }
  }

  // ── Sessions ──────────────────────────────────────────────────────────

  pub async fn create_session(&self) -> Result<SessionToken> {
    self.sessions.create_session().await
  }

  pub async fn session_exists(&self, token: &SessionToken) -> Result<bool> {
    self.sessions.session_exists(token).await
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  pub async fn submit_vote(&self, req: VoteRequest) -> Result<()> {
    let score = match self.validator.validate(&req) {
      Ok(score) => score,
      Err(e) => {
        tracing::warn!(error = %e, "vote rejected");
        return Err(e);
      }
    };

    if !self.sessions.session_exists(&req.session_token).await? {
      tracing::warn!(session_id = %req.session_token, "invalid session ID");
      return Err(ServiceError::InvalidSession(req.session_token));
    }

    if !self.catalog.is_valid_product_id(&req.product_id).await? {
      tracing::warn!(product_id = %req.product_id, "invalid product ID");
      return Err(ServiceError::InvalidProduct(req.product_id));
    }

    self
      .ledger
      .save_vote(&req.session_token, &req.product_id, score.into())
      .await?;

    tracing::info!(
      session_id = %req.session_token,
      product_id = %req.product_id,
      score = %score,
      "saved vote"
    );
    Ok(())
  }

  pub async fn get_votes_by_session(&self, token: &SessionToken) -> Result<Vec<Vote>> {
    self.ledger.get_votes_by_session(token).await
  }

  pub async fn get_aggregated_scores(&self) -> Result<Vec<ProductScore>> {
    self.aggregator.get_aggregated_scores().await
  }

  // ── Catalog ───────────────────────────────────────────────────────────

  pub async fn refresh_catalog<C: CatalogSource>(&self, source: &C) -> Result<usize> {
    self.catalog.refresh_catalog(source).await
  }

  pub async fn is_valid_product_id(&self, product_id: &ProductId) -> Result<bool> {
    self.catalog.is_valid_product_id(product_id).await
  }

  pub async fn list_products(&self) -> Result<Vec<Product>> {
    self.catalog.list_products().await
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  pub async fn close(&self) -> Result<()> {
    self.store.close().await.map_err(ServiceError::store)
  }
}
