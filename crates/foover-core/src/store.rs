//! The `VoteStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `foover-store-sqlite`).
//! The service layer depends on this abstraction, not on any concrete
//! backend, so tests can substitute their own implementation.

use std::future::Future;

use crate::{
  product::{Product, ProductId},
  session::SessionToken,
  vote::{ProductScore, Score, Vote},
};

/// Classification hook for backend errors.
///
/// Lets callers tell a timed-out operation apart from any other storage
/// failure without knowing the concrete error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_timeout(&self) -> bool;
}

/// Abstraction over a Foover storage backend.
///
/// Three uniquely keyed record sets exist: sessions by token, products by
/// external id, and votes by `(session_token, product_id)`. Nothing else is
/// persisted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait VoteStore: Send + Sync {
  type Error: StoreError;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Generate, persist and return a fresh session token.
  fn create_session(
    &self,
  ) -> impl Future<Output = Result<SessionToken, Self::Error>> + Send + '_;

  /// Exact-match existence check. An unknown token is `Ok(false)`.
  fn session_exists<'a>(
    &'a self,
    token: &'a SessionToken,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Insert or overwrite the vote for `(token, product_id)`.
  ///
  /// Must be a single atomic conditional write on the composite key:
  /// concurrent calls for the same pair never produce two rows.
  fn save_vote<'a>(
    &'a self,
    token: &'a SessionToken,
    product_id: &'a ProductId,
    score: Score,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All votes cast by a session, in no particular order.
  fn get_votes_by_session<'a>(
    &'a self,
    token: &'a SessionToken,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + 'a;

  /// Mean score and count per product, over products with at least one vote.
  fn get_aggregated_scores(
    &self,
  ) -> impl Future<Output = Result<Vec<ProductScore>, Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Replace the whole product set with `products`.
  fn save_products(
    &self,
    products: Vec<ProductId>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn is_valid_product_id<'a>(
    &'a self,
    product_id: &'a ProductId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// The current catalog snapshot.
  fn list_products(
    &self,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Release the backend. Subsequent calls fail.
  fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
