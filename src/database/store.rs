use async_trait::async_trait;
use error_stack::ResultExt;

use super::{ErrorExt2, Pool, PoolConnection, Result};
use crate::{
  config,
  schema::{NewPost, Post},
};

/// Durable storage of posts.
///
/// Posts are only ever inserted and read back newest first. The
/// store assigns the id and the creation time of every post.
#[async_trait]
pub trait PostStore: std::fmt::Debug + Send + Sync {
  async fn insert_post(&self, post: NewPost<'_>) -> Result<Post>;

  async fn count_posts(&self) -> Result<u64>;

  /// Lists posts ordered by creation time (newest first), skipping
  /// `skip` posts and taking at most `take`.
  async fn list_recent_posts(&self, skip: u64, take: u64) -> Result<Vec<Post>>;
}

/// [`PostStore`] backed by a Postgres primary database and
/// optionally a read-only replica.
#[derive(Debug, Clone)]
pub struct PgPostStore {
  primary: Pool,
  replica: Option<Pool>,
}

impl PgPostStore {
  #[tracing::instrument(skip_all, name = "db.init")]
  pub async fn connect(cfg: &config::Database) -> Result<Self> {
    let primary = Pool::new(cfg, &cfg.primary).await?;
    let replica = if let Some(replica) = cfg.replica.as_ref() {
      Some(Pool::new(cfg, replica).await?)
    } else {
      None
    };

    if cfg.primary.readonly {
      tracing::warn!("primary database is configured as read-only, skipping migrations");
    } else {
      primary
        .migrate()
        .await
        .attach_printable("while preparing the primary database")?;
    }

    Ok(Self { primary, replica })
  }

  #[tracing::instrument(skip_all)]
  async fn db_write(&self) -> Result<PoolConnection> {
    self.primary.get().await
  }

  #[tracing::instrument(skip_all)]
  async fn db_read(&self) -> Result<PoolConnection> {
    if let Some(replica) = self.replica.as_ref() {
      match replica.get().await {
        Ok(conn) => return Ok(conn),
        // fallback
        Err(err) if err.is_unhealthy() => {
          tracing::debug!("replica is unhealthy, reading from primary");
        },
        Err(err) => return Err(err),
      }
    }
    self.primary.get().await
  }
}

#[async_trait]
impl PostStore for PgPostStore {
  async fn insert_post(&self, post: NewPost<'_>) -> Result<Post> {
    let mut conn = self.db_write().await?;
    post
      .insert(&mut conn)
      .await
      .attach_printable_lazy(|| format!("title length = {}", post.title.len()))
  }

  async fn count_posts(&self) -> Result<u64> {
    let mut conn = self.db_read().await?;
    Post::count(&mut conn).await
  }

  async fn list_recent_posts(&self, skip: u64, take: u64) -> Result<Vec<Post>> {
    let mut conn = self.db_read().await?;
    Post::list_recent(&mut conn, skip, take)
      .await
      .attach_printable_lazy(|| format!("skip = {skip}, take = {take}"))
  }
}
