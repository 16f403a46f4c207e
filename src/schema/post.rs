use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
  database::{error::ErrorExt, Connection, Result},
  types::id::PostId,
};

/// A published post as it is stored and served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub id: PostId,
  pub title: String,
  pub content: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Values of a post that is about to be inserted. The store assigns
/// both the id and the creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost<'a> {
  pub title: &'a str,
  pub content: Option<&'a str>,
}

impl Post {
  #[tracing::instrument(skip(conn), name = "db.posts.list")]
  pub async fn list_recent(conn: &mut Connection, skip: u64, take: u64) -> Result<Vec<Self>> {
    sqlx::query_as::<_, Self>(
      r#"SELECT * FROM "posts" ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"#,
    )
    .bind(i64::try_from(skip).unwrap_or(i64::MAX))
    .bind(i64::try_from(take).unwrap_or(i64::MAX))
    .fetch_all(conn)
    .await
    .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.posts.count")]
  pub async fn count(conn: &mut Connection) -> Result<u64> {
    let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "posts""#)
      .fetch_one(conn)
      .await
      .into_db_error()?;

    Ok(u64::try_from(count).unwrap_or_default())
  }
}

impl NewPost<'_> {
  #[tracing::instrument(skip_all, name = "db.posts.insert")]
  pub async fn insert(&self, conn: &mut Connection) -> Result<Post> {
    sqlx::query_as::<_, Post>(
      r#"INSERT INTO "posts" (title, content) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(self.title)
    .bind(self.content)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
