use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
  config,
  database::{MemoryPostStore, PgPostStore, PostStore},
};

/// State shared by every request handler. Cloning it is cheap.
#[derive(Debug, Clone)]
pub struct App {
  pub config: Arc<config::Server>,
  pub store: Arc<dyn PostStore>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  #[tracing::instrument(skip_all)]
  pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
    let store: Arc<dyn PostStore> = if let Some(db) = cfg.db.as_ref() {
      Arc::new(PgPostStore::connect(db).await.change_context(AppError)?)
    } else {
      tracing::warn!("no database is configured, posts will be kept in memory");
      Arc::new(MemoryPostStore::new())
    };

    Ok(Self::with_store(cfg, store))
  }

  #[must_use]
  pub fn with_store(cfg: config::Server, store: Arc<dyn PostStore>) -> Self {
    Self {
      config: Arc::new(cfg),
      store,
    }
  }
}
