//! Read-only handlers for aggregates and the current catalog.

use std::sync::Arc;

use axum::{Json, extract::State};
use foover_core::{product::Product, store::VoteStore, vote::ProductScore};
use foover_service::Coordinator;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
  pub scores: Vec<ProductScore>,
}

/// `GET /aggregated-scores`
pub async fn aggregated<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
) -> Result<Json<ScoresResponse>, ApiError>
where
  S: VoteStore,
{
  let scores = coordinator.get_aggregated_scores().await?;
  Ok(Json(ScoresResponse { scores }))
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
  pub products: Vec<Product>,
}

/// `GET /products`
pub async fn products<S>(
  State(coordinator): State<Arc<Coordinator<S>>>,
) -> Result<Json<ProductsResponse>, ApiError>
where
  S: VoteStore,
{
  let products = coordinator.list_products().await?;
  Ok(Json(ProductsResponse { products }))
}
