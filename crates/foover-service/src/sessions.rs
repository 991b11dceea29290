//! Session Registry: issues and checks anonymous session tokens.

use std::sync::Arc;

use foover_core::{session::SessionToken, store::VoteStore};

use crate::{Result, ServiceError};

pub struct SessionRegistry<S> {
  store: Arc<S>,
}

impl<S: VoteStore> SessionRegistry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn create_session(&self) -> Result<SessionToken> {
    let token = self.store.create_session().await.map_err(ServiceError::store)?;
    tracing::info!(session_id = %token, "created session");
    Ok(token)
  }

  pub async fn session_exists(&self, token: &SessionToken) -> Result<bool> {
    self.store.session_exists(token).await.map_err(ServiceError::store)
  }
}
