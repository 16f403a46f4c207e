use serde::de::{Error as DeError, Unexpected};
use std::{fmt::Display, num::NonZeroU64};
use thiserror::Error;

/// Identifier of a post. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostId(NonZeroU64);

impl PostId {
  /// # Panics
  ///
  /// It will panic if the value is 0.
  #[must_use]
  #[track_caller]
  pub const fn new(n: u64) -> Self {
    match NonZeroU64::new(n) {
      Some(n) => Self(n),
      None => panic!("post id is zero"),
    }
  }

  #[must_use]
  pub const fn from_nonzero(n: NonZeroU64) -> Self {
    Self(n)
  }

  #[must_use]
  pub const fn get(self) -> u64 {
    self.0.get()
  }
}

impl Display for PostId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.0, f)
  }
}

impl<'de> serde::Deserialize<'de> for PostId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor;

    impl<'de> serde::de::Visitor<'de> for Visitor {
      type Value = PostId;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a positive integer id")
      }

      fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        let value = u64::try_from(v)
          .map_err(|_| DeError::invalid_value(Unexpected::Signed(v), &"nonzero u64"))?;

        self.visit_u64(value)
      }

      fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        NonZeroU64::new(v)
          .map(PostId)
          .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(v), &"nonzero u64"))
      }
    }

    deserializer.deserialize_u64(Visitor)
  }
}

impl serde::Serialize for PostId {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_u64(self.get())
  }
}

#[derive(Debug, Error)]
#[error("post id {0} does not fit in BIGINT")]
struct OutOfRangeError(u64);

#[derive(Debug, Error)]
#[error("post ids must be positive, got {0}")]
struct NotPositiveError(i64);

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PostId {
  fn encode_by_ref(
    &self,
    buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
  ) -> sqlx::encode::IsNull {
    // ids come from a BIGSERIAL column
    match i64::try_from(self.get()) {
      Ok(value) => <i64 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&value, buf),
      Err(..) => {
        tracing::warn!(error = %OutOfRangeError(self.get()), "encoding post id as NULL");
        sqlx::encode::IsNull::Yes
      },
    }
  }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PostId {
  fn decode(
    value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
  ) -> Result<Self, sqlx::error::BoxDynError> {
    let value = <i64 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
    u64::try_from(value)
      .ok()
      .and_then(NonZeroU64::new)
      .map(PostId)
      .ok_or_else(|| Box::new(NotPositiveError(value)) as sqlx::error::BoxDynError)
  }
}

impl sqlx::Type<sqlx::Postgres> for PostId {
  fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
    <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_test::Token;
  use static_assertions::{assert_eq_size, assert_impl_all};

  assert_eq_size!(Option<PostId>, u64);
  assert_impl_all!(PostId:
    Send, Sync, std::hash::Hash, sqlx::Decode<'static, sqlx::Postgres>,
    sqlx::Encode<'static, sqlx::Postgres>, sqlx::Type<sqlx::Postgres>
  );

  #[test]
  #[should_panic(expected = "post id is zero")]
  fn zero_panics() {
    _ = PostId::new(0);
  }

  #[test]
  fn formatting() {
    assert_eq!("1234567890", PostId::new(1_234_567_890).to_string());
    assert_eq!("PostId(42)", format!("{:?}", PostId::new(42)));
  }

  #[test]
  fn serde_as_number() {
    let id = PostId::new(1_234_567_890);
    serde_test::assert_de_tokens(&id, &[Token::U64(1_234_567_890)]);
    serde_test::assert_de_tokens(&id, &[Token::I64(1_234_567_890)]);
    serde_test::assert_ser_tokens(&id, &[Token::U64(1_234_567_890)]);
  }

  #[test]
  fn rejects_zero_and_negative() {
    serde_test::assert_de_tokens_error::<PostId>(
      &[Token::U64(0)],
      "invalid value: integer `0`, expected nonzero u64",
    );
    serde_test::assert_de_tokens_error::<PostId>(
      &[Token::I64(-4)],
      "invalid value: integer `-4`, expected nonzero u64",
    );
  }
}
