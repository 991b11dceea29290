//! Catalog Sync: pulls the external product listing and replaces the local
//! product set with it.
//!
//! A refresh is a full sync, not a merge. An empty listing empties the
//! catalog. The replace runs as one store transaction, so a concurrent
//! [`CatalogSync::is_valid_product_id`] sees either the old set or the new
//! one.

use std::{future::Future, sync::Arc, time::Duration};

use foover_core::{
  product::{Product, ProductId},
  store::VoteStore,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Result, ServiceError};

// ─── Source ──────────────────────────────────────────────────────────────────

/// Producer of the authoritative list of product identifiers.
pub trait CatalogSource: Send + Sync {
  fn fetch_products(&self) -> impl Future<Output = Result<Vec<ProductId>>> + Send + '_;
}

/// Wire shape of the machine listing:
/// `{"data":{"machineProducts":[{"id":"…"}, …]}}`.
#[derive(Debug, Deserialize)]
struct Listing {
  data: Object<ListingData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingData {
  #[serde(default)]
  machine_products: Option<Vec<Object<ListedProduct>>>,
}

#[derive(Debug, Deserialize)]
struct ListedProduct {
  id: String,
}

/// Decodes `T` from a JSON object only; derived struct impls also accept
/// arrays.
#[derive(Debug)]
struct Object<T>(T);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Object<T> {
  fn deserialize<D: Deserializer<'de>>(de: D) -> std::result::Result<Self, D::Error> {
    let map = Map::<String, Value>::deserialize(de)?;
    T::deserialize(Value::Object(map))
      .map(Object)
      .map_err(serde::de::Error::custom)
  }
}

/// Decode a listing body. Any malformed item fails the whole listing; a
/// missing or `null` product array is an empty listing.
pub fn decode_listing(body: &[u8]) -> Result<Vec<ProductId>> {
  let Object(listing) = serde_json::from_slice::<Object<Listing>>(body)?;
  Ok(
    listing
      .data
      .0
      .machine_products
      .unwrap_or_default()
      .into_iter()
      .map(|Object(p)| ProductId::from(p.id))
      .collect(),
  )
}

/// Fetches the listing over HTTP(S).
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpCatalogSource {
  client: reqwest::Client,
  url:    String,
}

impl HttpCatalogSource {
  pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ServiceError::Fetch(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, url: url.into() })
  }

  pub fn url(&self) -> &str { &self.url }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
  if err.is_timeout() {
    ServiceError::Timeout(Box::new(err))
  } else {
    ServiceError::Fetch(err.to_string())
  }
}

impl CatalogSource for HttpCatalogSource {
  async fn fetch_products(&self) -> Result<Vec<ProductId>> {
    let resp = self
      .client
      .get(&self.url)
      .send()
      .await
      .map_err(transport_error)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(ServiceError::Fetch(format!(
        "GET {} → {status}",
        self.url
      )));
    }

    let body = resp.bytes().await.map_err(transport_error)?;
    decode_listing(&body)
  }
}

// ─── Sync ────────────────────────────────────────────────────────────────────

pub struct CatalogSync<S> {
  store: Arc<S>,
}

impl<S: VoteStore> CatalogSync<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Fetch from `source` and replace the stored catalog. Returns the number
  /// of identifiers in the listing.
  ///
  /// Nothing is written if the fetch or decode fails.
  pub async fn refresh_catalog<C: CatalogSource>(&self, source: &C) -> Result<usize> {
    let products = source.fetch_products().await?;
    let count = products.len();

    self
      .store
      .save_products(products)
      .await
      .map_err(ServiceError::store)?;

    tracing::info!(count, "catalog refreshed");
    Ok(count)
  }

  pub async fn is_valid_product_id(&self, product_id: &ProductId) -> Result<bool> {
    self
      .store
      .is_valid_product_id(product_id)
      .await
      .map_err(ServiceError::store)
  }

  pub async fn list_products(&self) -> Result<Vec<Product>> {
    self.store.list_products().await.map_err(ServiceError::store)
  }
}
