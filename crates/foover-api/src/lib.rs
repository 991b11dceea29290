//! JSON REST API for Foover.
//!
//! Exposes an axum [`Router`] backed by a [`Coordinator`] over any
//! [`VoteStore`]. TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = foover_api::api_router(Arc::new(Coordinator::new(store)));
//! ```

pub mod error;
pub mod scores;
pub mod sessions;
pub mod votes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use foover_core::store::VoteStore;
use foover_service::Coordinator;

pub use error::ApiError;

/// Build the API router for `coordinator`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(coordinator: Arc<Coordinator<S>>) -> Router<()>
where
  S: VoteStore + 'static,
{
  Router::new()
    // Sessions
    .route("/sessions", post(sessions::create::<S>))
    .route("/sessions/{session_id}", get(sessions::get_one::<S>))
    // Votes
    .route("/votes", post(votes::save::<S>))
    .route("/votes/{session_id}", get(votes::list::<S>))
    // Reads
    .route("/aggregated-scores", get(scores::aggregated::<S>))
    .route("/products", get(scores::products::<S>))
    .with_state(coordinator)
}
