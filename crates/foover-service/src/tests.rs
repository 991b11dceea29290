//! Service-layer tests, against both the SQLite store and a recording mock.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{Router, http::StatusCode, routing::get};
use foover_core::{
  product::{Product, ProductId},
  session::SessionToken,
  store::{StoreError, VoteStore},
  vote::{ProductScore, Score, Vote},
};
use foover_store_sqlite::{SqliteStore, StoreConfig};
use tokio::{net::TcpListener, sync::Barrier};

use crate::{
  Coordinator, ServiceError,
  catalog::{CatalogSource, HttpCatalogSource},
  validate::VoteRequest,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn sqlite() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory(StoreConfig::default())
      .await
      .expect("in-memory store"),
  )
}

/// A fixed in-memory listing.
struct StaticSource(Vec<&'static str>);

impl CatalogSource for StaticSource {
  async fn fetch_products(&self) -> crate::Result<Vec<ProductId>> {
    Ok(self.0.iter().map(|s| ProductId::from(*s)).collect())
  }
}

/// A listing that always fails to arrive.
struct BrokenSource;

impl CatalogSource for BrokenSource {
  async fn fetch_products(&self) -> crate::Result<Vec<ProductId>> {
    Err(ServiceError::Fetch("connection reset".into()))
  }
}

fn vote(token: &SessionToken, product: &str, score: i64) -> VoteRequest {
  VoteRequest {
    session_token: token.clone(),
    product_id:    product.into(),
    score,
  }
}

fn scores_of(votes: &[Vote]) -> HashMap<String, u8> {
  votes
    .iter()
    .map(|v| (v.product_id.to_string(), v.score.get()))
    .collect()
}

// ─── Recording mock store ────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("mock store failure")]
struct MockError {
  timeout: bool,
}

impl StoreError for MockError {
  fn is_timeout(&self) -> bool { self.timeout }
}

/// Answers existence checks from flags and logs every call it receives.
#[derive(Default)]
struct RecordingStore {
  calls:          Mutex<Vec<&'static str>>,
  session_known:  bool,
  product_known:  bool,
  fail_writes:    bool,
  timeout_reads:  bool,
}

impl RecordingStore {
  fn record(&self, call: &'static str) { self.calls.lock().unwrap().push(call); }

  fn calls(&self) -> Vec<&'static str> { self.calls.lock().unwrap().clone() }

  fn read_result<T>(&self, value: T) -> Result<T, MockError> {
    if self.timeout_reads { Err(MockError { timeout: true }) } else { Ok(value) }
  }

  fn write_result(&self) -> Result<(), MockError> {
    if self.fail_writes { Err(MockError { timeout: false }) } else { Ok(()) }
  }
}

impl VoteStore for RecordingStore {
  type Error = MockError;

  async fn create_session(&self) -> Result<SessionToken, MockError> {
    self.record("create_session");
    self.write_result().map(|_| SessionToken::generate())
  }

  async fn session_exists(&self, _token: &SessionToken) -> Result<bool, MockError> {
    self.record("session_exists");
    self.read_result(self.session_known)
  }

  async fn save_vote(
    &self,
    _token: &SessionToken,
    _product_id: &ProductId,
    _score: Score,
  ) -> Result<(), MockError> {
    self.record("save_vote");
    self.write_result()
  }

  async fn get_votes_by_session(&self, _token: &SessionToken) -> Result<Vec<Vote>, MockError> {
    self.record("get_votes_by_session");
    self.read_result(vec![])
  }

  async fn get_aggregated_scores(&self) -> Result<Vec<ProductScore>, MockError> {
    self.record("get_aggregated_scores");
    self.read_result(vec![])
  }

  async fn save_products(&self, _products: Vec<ProductId>) -> Result<(), MockError> {
    self.record("save_products");
    self.write_result()
  }

  async fn is_valid_product_id(&self, _product_id: &ProductId) -> Result<bool, MockError> {
    self.record("is_valid_product_id");
    self.read_result(self.product_known)
  }

  async fn list_products(&self) -> Result<Vec<Product>, MockError> {
    self.record("list_products");
    self.read_result(vec![])
  }

  async fn close(&self) -> Result<(), MockError> {
    self.record("close");
    Ok(())
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_session_exists_immediately() {
  let c = Coordinator::new(sqlite().await);
  let token = c.create_session().await.unwrap();
  assert!(c.session_exists(&token).await.unwrap());
  assert!(!c.session_exists(&SessionToken::generate()).await.unwrap());
}

#[tokio::test]
async fn session_write_failure_is_storage_error() {
  let store = Arc::new(RecordingStore { fail_writes: true, ..Default::default() });
  let err = Coordinator::new(store).create_session().await.unwrap_err();
  assert!(matches!(err, ServiceError::Storage(_)));
  assert!(!err.is_client_fault());
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_replaces_catalog() {
  let c = Coordinator::new(sqlite().await);

  assert_eq!(c.refresh_catalog(&StaticSource(vec!["A", "B"])).await.unwrap(), 2);
  assert!(c.is_valid_product_id(&"A".into()).await.unwrap());
  assert!(!c.is_valid_product_id(&"C".into()).await.unwrap());

  c.refresh_catalog(&StaticSource(vec!["C"])).await.unwrap();
  assert!(!c.is_valid_product_id(&"A".into()).await.unwrap());
  assert!(c.is_valid_product_id(&"C".into()).await.unwrap());
  assert_eq!(c.list_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_catalog() {
  let c = Coordinator::new(sqlite().await);
  c.refresh_catalog(&StaticSource(vec!["A"])).await.unwrap();

  let err = c.refresh_catalog(&BrokenSource).await.unwrap_err();
  assert!(matches!(err, ServiceError::Fetch(_)));
  assert!(c.is_valid_product_id(&"A".into()).await.unwrap());
}

#[tokio::test]
async fn failed_fetch_never_touches_store() {
  let store = Arc::new(RecordingStore::default());
  let c = Coordinator::new(store.clone());
  c.refresh_catalog(&BrokenSource).await.unwrap_err();
  assert!(store.calls().is_empty());
}

// ─── Submit vote ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn revote_overwrites_previous_score() {
  let c = Coordinator::new(sqlite().await);
  c.refresh_catalog(&StaticSource(vec!["p1"])).await.unwrap();
  let t = c.create_session().await.unwrap();

  c.submit_vote(vote(&t, "p1", 2)).await.unwrap();
  c.submit_vote(vote(&t, "p1", 5)).await.unwrap();

  let votes = c.get_votes_by_session(&t).await.unwrap();
  assert_eq!(votes.len(), 1);
  assert_eq!(votes[0].score.get(), 5);
}

#[tokio::test]
async fn out_of_range_score_writes_nothing() {
  let c = Coordinator::new(sqlite().await);
  c.refresh_catalog(&StaticSource(vec!["p1"])).await.unwrap();
  let t = c.create_session().await.unwrap();
  c.submit_vote(vote(&t, "p1", 3)).await.unwrap();

  for bad in [0, 6, -1, 100] {
    let err = c.submit_vote(vote(&t, "p1", bad)).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidScore(v) if v == bad));
    assert!(err.is_client_fault());
  }
  // Also when session and product are both invalid.
  let err = c
    .submit_vote(vote(&SessionToken::generate(), "nope", 9))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::InvalidScore(9)));

  let votes = c.get_votes_by_session(&t).await.unwrap();
  assert_eq!(votes.len(), 1);
  assert_eq!(votes[0].score.get(), 3);
}

#[tokio::test]
async fn out_of_range_score_never_reaches_store() {
  let store = Arc::new(RecordingStore {
    session_known: true,
    product_known: true,
    ..Default::default()
  });
  let c = Coordinator::new(store.clone());
  c.submit_vote(vote(&SessionToken::generate(), "p1", 6))
    .await
    .unwrap_err();
  assert!(store.calls().is_empty());
}

#[tokio::test]
async fn unknown_session_rejected_before_product_check() {
  let store = Arc::new(RecordingStore { product_known: true, ..Default::default() });
  let c = Coordinator::new(store.clone());

  let err = c
    .submit_vote(vote(&SessionToken::generate(), "p1", 3))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::InvalidSession(_)));
  assert_eq!(store.calls(), vec!["session_exists"]);
}

#[tokio::test]
async fn unknown_product_rejected_without_write() {
  let store = Arc::new(RecordingStore { session_known: true, ..Default::default() });
  let c = Coordinator::new(store.clone());

  let err = c
    .submit_vote(vote(&SessionToken::generate(), "p1", 3))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::InvalidProduct(ref p) if p.as_str() == "p1"));
  assert_eq!(store.calls(), vec!["session_exists", "is_valid_product_id"]);
}

#[tokio::test]
async fn valid_vote_checks_then_writes() {
  let store = Arc::new(RecordingStore {
    session_known: true,
    product_known: true,
    ..Default::default()
  });
  let c = Coordinator::new(store.clone());

  c.submit_vote(vote(&SessionToken::generate(), "p1", 3))
    .await
    .unwrap();
  assert_eq!(
    store.calls(),
    vec!["session_exists", "is_valid_product_id", "save_vote"]
  );
}

#[tokio::test]
async fn storage_failures_are_surfaced() {
  let store = Arc::new(RecordingStore {
    session_known: true,
    product_known: true,
    fail_writes: true,
    ..Default::default()
  });
  let err = Coordinator::new(store)
    .submit_vote(vote(&SessionToken::generate(), "p1", 3))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::Storage(_)));
}

#[tokio::test]
async fn store_timeouts_are_classified() {
  let store = Arc::new(RecordingStore { timeout_reads: true, ..Default::default() });
  let c = Coordinator::new(store);

  let err = c
    .submit_vote(vote(&SessionToken::generate(), "p1", 3))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::Timeout(_)));
  assert!(matches!(
    c.get_aggregated_scores().await.unwrap_err(),
    ServiceError::Timeout(_)
  ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_leave_one_row() {
  let c = Arc::new(Coordinator::new(sqlite().await));
  c.refresh_catalog(&StaticSource(vec!["p1"])).await.unwrap();
  let t = c.create_session().await.unwrap();

  let barrier = Arc::new(Barrier::new(8));
  let handles: Vec<_> = (0..8)
    .map(|i| {
      let (c, t, barrier) = (c.clone(), t.clone(), barrier.clone());
      tokio::spawn(async move {
        barrier.wait().await;
        c.submit_vote(vote(&t, "p1", i % 5 + 1)).await
      })
    })
    .collect();
  for h in handles {
    h.await.unwrap().unwrap();
  }

  let votes = c.get_votes_by_session(&t).await.unwrap();
  assert_eq!(votes.len(), 1);
  assert!((1..=5).contains(&votes[0].score.get()));

  let scores = c.get_aggregated_scores().await.unwrap();
  assert_eq!(scores.len(), 1);
  assert_eq!(scores[0].vote_count, 1);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_and_aggregate_scenario() {
  let c = Coordinator::new(sqlite().await);
  let s = c.create_session().await.unwrap();
  c.refresh_catalog(&StaticSource(vec!["p1", "p2"])).await.unwrap();

  c.submit_vote(vote(&s, "p1", 5)).await.unwrap();
  c.submit_vote(vote(&s, "p1", 3)).await.unwrap();
  c.submit_vote(vote(&s, "p2", 4)).await.unwrap();

  let votes = c.get_votes_by_session(&s).await.unwrap();
  assert_eq!(
    scores_of(&votes),
    HashMap::from([("p1".to_string(), 3), ("p2".to_string(), 4)])
  );

  let mut scores = c.get_aggregated_scores().await.unwrap();
  scores.sort_by(|a, b| a.product_id.cmp(&b.product_id));
  assert_eq!(
    scores,
    vec![
      ProductScore { product_id: "p1".into(), avg_score: 3.0, vote_count: 1 },
      ProductScore { product_id: "p2".into(), avg_score: 4.0, vote_count: 1 },
    ]
  );
}

#[tokio::test]
async fn reads_are_empty_not_absent() {
  let c = Coordinator::new(sqlite().await);
  let s = c.create_session().await.unwrap();
  assert!(c.get_votes_by_session(&s).await.unwrap().is_empty());
  assert!(c.get_aggregated_scores().await.unwrap().is_empty());
}

// ─── HTTP catalog source ─────────────────────────────────────────────────────

/// Serve a single canned response on an ephemeral port and return its URL.
async fn serve_listing(status: StatusCode, body: &'static str, delay: Duration) -> String {
  let app = Router::new().route(
    "/listing",
    get(move || async move {
      tokio::time::sleep(delay).await;
      (status, body)
    }),
  );
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}/listing")
}

#[tokio::test]
async fn http_source_decodes_listing() {
  let url = serve_listing(
    StatusCode::OK,
    r#"{"data":{"machineProducts":[{"id":"x"},{"id":"y"}]}}"#,
    Duration::ZERO,
  )
  .await;
  let source = HttpCatalogSource::new(url, Duration::from_secs(5)).unwrap();

  let c = Coordinator::new(sqlite().await);
  assert_eq!(c.refresh_catalog(&source).await.unwrap(), 2);
  assert!(c.is_valid_product_id(&"y".into()).await.unwrap());
}

#[tokio::test]
async fn http_source_non_success_is_fetch_error() {
  let url = serve_listing(StatusCode::BAD_GATEWAY, "upstream down", Duration::ZERO).await;
  let source = HttpCatalogSource::new(url, Duration::from_secs(5)).unwrap();
  assert!(matches!(
    source.fetch_products().await,
    Err(ServiceError::Fetch(_))
  ));
}

#[tokio::test]
async fn http_source_malformed_body_is_decode_error() {
  let url = serve_listing(StatusCode::OK, r#"{"data":[]}"#, Duration::ZERO).await;
  let source = HttpCatalogSource::new(url, Duration::from_secs(5)).unwrap();
  assert!(matches!(
    source.fetch_products().await,
    Err(ServiceError::Decode(_))
  ));
}

#[tokio::test]
async fn malformed_listing_keeps_previous_catalog() {
  let c = Coordinator::new(sqlite().await);
  c.refresh_catalog(&StaticSource(vec!["A"])).await.unwrap();

  let url = serve_listing(StatusCode::OK, r#"{"data":[]}"#, Duration::ZERO).await;
  let source = HttpCatalogSource::new(url, Duration::from_secs(5)).unwrap();
  let err = c.refresh_catalog(&source).await.unwrap_err();

  assert!(matches!(err, ServiceError::Decode(_)));
  assert!(!err.is_client_fault());
  assert!(c.is_valid_product_id(&"A".into()).await.unwrap());
  assert_eq!(c.list_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn http_source_slow_upstream_times_out() {
  let url = serve_listing(StatusCode::OK, "{}", Duration::from_secs(5)).await;
  let source = HttpCatalogSource::new(url, Duration::from_millis(100)).unwrap();
  assert!(matches!(
    source.fetch_products().await,
    Err(ServiceError::Timeout(_))
  ));
}

#[tokio::test]
async fn http_source_unreachable_is_fetch_error() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let source =
    HttpCatalogSource::new(format!("http://{addr}/listing"), Duration::from_secs(5)).unwrap();
  assert!(matches!(
    source.fetch_products().await,
    Err(ServiceError::Fetch(_))
  ));
}
