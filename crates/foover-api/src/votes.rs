//! Handlers for `/votes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/votes` | Body: [`SaveVoteBody`]; 201 on success |
//! | `GET`  | `/votes/:session_id` | Empty list for unknown sessions |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use foover_core::{store::VoteStore, vote::Vote};
use foover_service::{Coordinator, validate::VoteRequest};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Save ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveVoteBody {
  pub session_id: String,
  pub product_id: String,
  pub score:      i64,
}

/// `POST /votes` — body: `{"session_id":"…","product_id":"…","score":4}`
pub async fn save<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
  body: Result<Json<SaveVoteBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
{
  let Json(body) = body.map_err(|e| {
    tracing::warn!(error = %e, "invalid vote payload");
    ApiError::invalid_payload()
  })?;

  coordinator
    .submit_vote(VoteRequest {
      session_token: body.session_id.into(),
      product_id:    body.product_id.into(),
      score:         body.score,
    })
    .await?;

  Ok(StatusCode::CREATED)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VotesResponse {
  pub votes: Vec<Vote>,
}

/// `GET /votes/:session_id`
pub async fn list<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
  Path(session_id): Path<String>,
) -> Result<Json<VotesResponse>, ApiError>
where
  S: VoteStore,
{
  let votes = coordinator
    .get_votes_by_session(&session_id.into())
    .await?;
  Ok(Json(VotesResponse { votes }))
}
