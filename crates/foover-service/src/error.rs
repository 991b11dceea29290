//! Classified service errors.
//!
//! Every public operation returns either a value or exactly one of these.
//! The first four variants are the caller's fault; the rest are ours.

use foover_core::{product::ProductId, session::SessionToken, store::StoreError};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("score {0} must be between 1 and 5")]
  InvalidScore(i64),

  #[error("{0}")]
  Validation(String),

  #[error("invalid session ID: {0}")]
  InvalidSession(SessionToken),

  #[error("invalid product ID: {0}")]
  InvalidProduct(ProductId),

  #[error("storage error: {0}")]
  Storage(#[source] BoxError),

  #[error("timed out: {0}")]
  Timeout(#[source] BoxError),

  #[error("catalog fetch failed: {0}")]
  Fetch(String),

  #[error("catalog decode failed: {0}")]
  Decode(#[from] serde_json::Error),
}

impl ServiceError {
  /// Wrap a backend error, keeping timeouts distinguishable.
  pub fn store<E: StoreError>(err: E) -> Self {
    if err.is_timeout() {
      Self::Timeout(Box::new(err))
    } else {
      Self::Storage(Box::new(err))
    }
  }

  /// `true` when the request itself was unacceptable and nothing was written.
  pub fn is_client_fault(&self) -> bool {
    matches!(
      self,
      Self::InvalidScore(_)
        | Self::Validation(_)
        | Self::InvalidSession(_)
        | Self::InvalidProduct(_)
    )
  }
}

impl From<foover_core::Error> for ServiceError {
  fn from(err: foover_core::Error) -> Self {
    match err {
      foover_core::Error::InvalidScore(v) => Self::InvalidScore(v),
    }
  }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
