use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Logging {
  /// How log lines are laid out in the console.
  ///
  /// **Environment variables**:
  /// - `POSTBOARD_LOGGING_STYLE`
  pub style: LoggingStyle,
  /// Which spans and events are emitted, written in the same syntax
  /// as `RUST_LOG` (`info,postboard=debug` for example).
  ///
  /// **Environment variables**:
  /// - `POSTBOARD_LOGGING_FILTER`
  pub filter: String,
}

impl Logging {
  pub const DEFAULT_FILTER: &'static str = "info";
}

impl Default for Logging {
  fn default() -> Self {
    Self {
      style: LoggingStyle::default(),
      filter: Self::DEFAULT_FILTER.into(),
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggingStyle {
  Compact,
  #[default]
  Full,
  Pretty,
}

impl Display for LoggingStyle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Compact => f.write_str("compact"),
      Self::Full => f.write_str("full"),
      Self::Pretty => f.write_str("pretty"),
    }
  }
}

impl<'de> Deserialize<'de> for LoggingStyle {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
      type Value = LoggingStyle;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("logging style")
      }

      fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
      where
        E: serde::de::Error,
      {
        LoggingStyle::from_str(v).map_err(serde::de::Error::custom)
      }
    }

    deserializer.deserialize_str(Visitor)
  }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} logging style")]
pub struct InvalidLoggingStyle(String);

impl FromStr for LoggingStyle {
  type Err = InvalidLoggingStyle;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    let s = s.to_lowercase();
    match s.as_str() {
      "compact" => Ok(Self::Compact),
      "full" => Ok(Self::Full),
      "pretty" => Ok(Self::Pretty),
      _ => Err(InvalidLoggingStyle(s)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_str() {
    assert_eq!(LoggingStyle::Compact, "compact".parse().unwrap());
    assert_eq!(LoggingStyle::Pretty, "PRETTY".parse().unwrap());
    assert!("json".parse::<LoggingStyle>().is_err());
  }
}
