//! Anonymous voting sessions.
//!
//! A session carries no identity beyond its opaque token. Sessions are never
//! mutated or deleted once issued.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, globally unique session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
  /// Generate a fresh token from OS randomness (UUID v4, hyphenated).
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl From<String> for SessionToken {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for SessionToken {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A persisted session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id:         i64,
  pub token:      SessionToken,
  pub created_at: DateTime<Utc>,
}
