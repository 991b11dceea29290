//! Request validation, injected into the [`Coordinator`](crate::Coordinator).

use foover_core::{product::ProductId, session::SessionToken, vote::Score};
use uuid::{Uuid, Version};

use crate::{Result, ServiceError};

/// A vote as submitted by a caller, before any checks.
#[derive(Debug, Clone)]
pub struct VoteRequest {
  pub session_token: SessionToken,
  pub product_id:    ProductId,
  pub score:         i64,
}

/// Stateless shape checks run before any store access.
pub trait VoteValidator: Send + Sync {
  /// Return the validated score, or the reason the request is rejected.
  fn validate(&self, req: &VoteRequest) -> Result<Score>;
}

/// Default policy: score in `Score::MIN..=Score::MAX`, identifiers non-empty,
/// free of whitespace and at most `max_id_len` bytes.
#[derive(Debug, Clone)]
pub struct ScorePolicy {
  pub max_id_len:   usize,
  /// Also require both identifiers to be UUID v4 strings.
  pub require_uuid: bool,
}

impl Default for ScorePolicy {
  fn default() -> Self { Self { max_id_len: 128, require_uuid: false } }
}

impl ScorePolicy {
  fn check_id(&self, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
      return Err(ServiceError::Validation(format!("Field '{field}' is required")));
    }
    if value.len() > self.max_id_len {
      return Err(ServiceError::Validation(format!(
        "Field '{field}' must be at most {} bytes",
        self.max_id_len
      )));
    }
    if value.chars().any(char::is_whitespace) {
      return Err(ServiceError::Validation(format!(
        "Field '{field}' must not contain whitespace"
      )));
    }
    if self.require_uuid && !is_uuid_v4(value) {
      return Err(ServiceError::Validation(format!(
        "Field '{field}' must be a UUID v4"
      )));
    }
    Ok(())
  }
}

fn is_uuid_v4(value: &str) -> bool {
  Uuid::try_parse(value).is_ok_and(|id| id.get_version() == Some(Version::Random))
}

impl VoteValidator for ScorePolicy {
  fn validate(&self, req: &VoteRequest) -> Result<Score> {
    let score = Score::new(req.score)?;
    self.check_id("session_id", req.session_token.as_str())?;
    self.check_id("product_id", req.product_id.as_str())?;
    Ok(score)
  }
}
