//! [`SqliteStore`] — the SQLite implementation of [`VoteStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use foover_core::{
  product::{Product, ProductId},
  session::SessionToken,
  store::VoteStore,
  vote::{ProductScore, Score, Vote},
};

use crate::{
  Error, Result,
  encode::{RawProductScore, RawVote, encode_dt, product_from_row},
  schema::SCHEMA,
};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Upper bounds on how long a single store call may take.
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
  pub read_timeout:  Duration,
  pub write_timeout: Duration,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      read_timeout:  Duration::from_secs(10),
      write_timeout: Duration::from_secs(5),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Foover vote store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one database thread, so statements are applied in submission order.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  config:          StoreConfig,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, config };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(config: StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, config };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .write("init_schema", |conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  async fn read<F, R>(&self, op: &'static str, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.bounded(op, self.config.read_timeout, f).await
  }

  async fn write<F, R>(&self, op: &'static str, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.bounded(op, self.config.write_timeout, f).await
  }

  /// Run `f` on the database thread, giving up after `budget`.
  ///
  /// A call that times out is abandoned, not cancelled: SQLite may still
  /// apply it once the thread gets to it.
  async fn bounded<F, R>(&self, op: &'static str, budget: Duration, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    match tokio::time::timeout(budget, self.conn.call(f)).await {
      Ok(res) => Ok(res?),
      Err(_) => Err(Error::Timeout { op, after: budget }),
    }
  }
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  type Error = Error;

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self) -> Result<SessionToken> {
    let token = SessionToken::generate();

    let token_str = token.as_str().to_owned();
    let at_str    = encode_dt(Utc::now());

    self
      .write("create_session", move |conn| {
        conn.execute(
          "INSERT INTO sessions (token, created_at) VALUES (?1, ?2)",
          rusqlite::params![token_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(token)
  }

  async fn session_exists(&self, token: &SessionToken) -> Result<bool> {
    let token_str = token.as_str().to_owned();

    self
      .read("session_exists", move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM sessions WHERE token = ?1",
              rusqlite::params![token_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn save_vote(
    &self,
    token:      &SessionToken,
    product_id: &ProductId,
    score:      Score,
  ) -> Result<()> {
    let token_str   = token.as_str().to_owned();
    let product_str = product_id.as_str().to_owned();
    let score_val   = i64::from(score);
    let at_str      = encode_dt(Utc::now());

    // One statement: the UNIQUE(session_token, product_id) constraint makes
    // the insert-or-overwrite atomic on the pair.
    self
      .write("save_vote", move |conn| {
        conn.execute(
          "INSERT INTO votes (session_token, product_id, score, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (session_token, product_id) DO UPDATE SET
             score      = excluded.score,
             updated_at = excluded.updated_at",
          rusqlite::params![token_str, product_str, score_val, at_str],
        )?;
        Ok(())
      })
      .await
  }

  async fn get_votes_by_session(&self, token: &SessionToken) -> Result<Vec<Vote>> {
    let token_str = token.as_str().to_owned();

    let raws: Vec<RawVote> = self
      .read("get_votes_by_session", move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, session_token, product_id, score, updated_at
           FROM votes WHERE session_token = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![token_str], RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  async fn get_aggregated_scores(&self) -> Result<Vec<ProductScore>> {
    let raws: Vec<RawProductScore> = self
      .read("get_aggregated_scores", |conn| {
        let mut stmt = conn.prepare(
          "SELECT product_id, AVG(CAST(score AS REAL)), COUNT(*)
           FROM votes
           GROUP BY product_id
           ORDER BY product_id",
        )?;
        let rows = stmt
          .query_map([], RawProductScore::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawProductScore::into_score).collect())
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn save_products(&self, products: Vec<ProductId>) -> Result<()> {
    let ids: Vec<String> = products.into_iter().map(ProductId::into_inner).collect();

    // Delete and re-insert inside one transaction so readers never see the
    // catalog empty mid-refresh. Duplicate ids in a listing collapse.
    self
      .write("save_products", move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM products", [])?;
        {
          let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO products (product_id) VALUES (?1)")?;
          for id in &ids {
            stmt.execute(rusqlite::params![id])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await
  }

  async fn is_valid_product_id(&self, product_id: &ProductId) -> Result<bool> {
    let product_str = product_id.as_str().to_owned();

    self
      .read("is_valid_product_id", move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM products WHERE product_id = ?1",
              rusqlite::params![product_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    self
      .read("list_products", |conn| {
        let mut stmt =
          conn.prepare("SELECT id, product_id FROM products ORDER BY id")?;
        let rows = stmt
          .query_map([], product_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn close(&self) -> Result<()> {
    self.conn.clone().close().await?;
    Ok(())
  }
}
