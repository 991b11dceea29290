//! Votes, scores and the derived per-product aggregate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, product::ProductId, session::SessionToken};

// ─── Score ───────────────────────────────────────────────────────────────────

/// A bounded vote score. Only values in `Score::MIN..=Score::MAX` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
  pub const MIN: i64 = 1;
  pub const MAX: i64 = 5;

  pub fn new(value: i64) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::InvalidScore(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<Score> for i64 {
  fn from(s: Score) -> Self { i64::from(s.0) }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

// ─── Vote ────────────────────────────────────────────────────────────────────

/// The single stored score for a `(session_token, product_id)` pair.
///
/// Re-voting overwrites `score` and `updated_at`; no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  #[serde(skip)]
  pub id:            i64,
  #[serde(rename = "session_id")]
  pub session_token: SessionToken,
  pub product_id:    ProductId,
  pub score:         Score,
  pub updated_at:    DateTime<Utc>,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Mean score and vote count for one product. Computed on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductScore {
  pub product_id: ProductId,
  pub avg_score:  f64,
  pub vote_count: u64,
}
