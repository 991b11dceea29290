//! Error type for `foover-store-sqlite`.

use std::time::Duration;

use foover_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] foover_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The operation did not complete within its configured budget.
  #[error("{op} timed out after {after:?}")]
  Timeout { op: &'static str, after: Duration },
}

impl StoreError for Error {
  fn is_timeout(&self) -> bool { matches!(self, Self::Timeout { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
