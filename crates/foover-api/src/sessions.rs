//! Handlers for `/sessions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sessions` | Body optional (`{}` or empty) |
//! | `GET`  | `/sessions/:session_id` | 404 if unknown |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
};
use foover_core::{session::SessionToken, store::VoteStore};
use foover_service::Coordinator;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Reserved for future session options; currently carries nothing.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
  pub session_id: SessionToken,
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /sessions`
pub async fn create<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
  body: Bytes,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: VoteStore,
{
  if !body.is_empty() {
    serde_json::from_slice::<CreateBody>(&body).map_err(|_| ApiError::invalid_payload())?;
  }

  let session_id = coordinator.create_session().await?;
  Ok(Json(SessionResponse { session_id }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /sessions/:session_id`
pub async fn get_one<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
  Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: VoteStore,
{
  let token = SessionToken::from(session_id);
  if !coordinator.session_exists(&token).await? {
    return Err(ApiError::NotFound(format!("session {token} not found")));
  }
  Ok(Json(SessionResponse { session_id: token }))
}
