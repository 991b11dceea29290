//! Catalog products.
//!
//! The catalog is owned by an external system. Locally we only keep the set
//! of identifiers from the most recent sync.

use std::fmt;

use serde::{Deserialize, Serialize};

/// External catalog identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl From<String> for ProductId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for ProductId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// A product row in the current catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  #[serde(skip)]
  pub id:         i64,
  pub product_id: ProductId,
}
