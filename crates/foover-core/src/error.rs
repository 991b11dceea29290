//! Error types for `foover-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("score {0} is outside the allowed range 1..=5")]
  InvalidScore(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
