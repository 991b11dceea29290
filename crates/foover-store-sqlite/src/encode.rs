//! Conversions between domain types and the plain column values stored in
//! SQLite.
//!
//! Timestamps are stored as RFC 3339 strings. Tokens and product ids are
//! stored verbatim.

use chrono::{DateTime, Utc};
use foover_core::{
  product::Product,
  vote::{ProductScore, Score, Vote},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `votes` row exactly as read from SQLite.
pub struct RawVote {
  pub id:            i64,
  pub session_token: String,
  pub product_id:    String,
  pub score:         i64,
  pub updated_at:    String,
}

impl RawVote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      session_token: row.get(1)?,
      product_id:    row.get(2)?,
      score:         row.get(3)?,
      updated_at:    row.get(4)?,
    })
  }

  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      id:            self.id,
      session_token: self.session_token.into(),
      product_id:    self.product_id.into(),
      score:         Score::new(self.score)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawProductScore {
  pub product_id: String,
  pub avg_score:  f64,
  pub vote_count: i64,
}

impl RawProductScore {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      product_id: row.get(0)?,
      avg_score:  row.get(1)?,
      vote_count: row.get(2)?,
    })
  }

  pub fn into_score(self) -> ProductScore {
    ProductScore {
      product_id: self.product_id.into(),
      avg_score:  self.avg_score,
      vote_count: self.vote_count.max(0) as u64,
    }
  }
}

pub fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
  Ok(Product {
    id:         row.get(0)?,
    product_id: row.get::<_, String>(1)?.into(),
  })
}
