use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::{Validate, ValidateError};

use super::{Database, Logging, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
  /// Address where the HTTP server listens to.
  ///
  /// **Environment variables**:
  /// - `POSTBOARD_IP`
  #[serde(default = "Server::default_ip")]
  pub ip: IpAddr,
  /// **Environment variables**:
  /// - `POSTBOARD_PORT`
  #[serde(default = "Server::default_port")]
  pub port: u16,
  /// Amount of HTTP worker threads.
  ///
  /// **Environment variables**:
  /// - `POSTBOARD_WORKERS`
  #[serde(default = "Server::default_workers")]
  pub workers: NonZeroUsize,
  #[serde(default)]
  pub logging: Logging,
  /// Postgres database where posts are stored. Posts are kept in
  /// memory and lost on shutdown if it is not set.
  #[serde(default)]
  pub db: Option<Database>,
}

impl Validate for Server {
  fn validate(&self) -> std::result::Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if let Err(error) = self.db.validate() {
      fields.insert("db", error);
    }
    fields.build().into_result()
  }
}

impl Default for Server {
  fn default() -> Self {
    Self {
      ip: Self::default_ip(),
      port: Self::default_port(),
      workers: Self::default_workers(),
      logging: Logging::default(),
      db: None,
    }
  }
}

impl Server {
  pub fn load() -> Result<Self, ParseError> {
    dotenvy::dotenv().ok();

    let config = Self::figment()
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "postboard.toml";
  const DEFAULT_PORT: u16 = 3000;

  /// Creates a default [`Figment`] object to load server
  /// configuration. This function is there for implementing
  /// [`Server::load`] and testing.
  ///
  /// [`Figment`]: figment::Figment
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    Figment::new()
      .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
      // One big con about figment (env provider to be specific) especially
      // these fields with underscore in it.
      .merge(Env::prefixed("POSTBOARD_").map(|v| {
        let key = v.as_str().to_ascii_lowercase();
        match key.as_str() {
          "db_primary_min_idle" => "db.primary.min_idle".into(),
          "db_primary_pool_size" => "db.primary.pool_size".into(),

          "db_replica_min_idle" => "db.replica.min_idle".into(),
          "db_replica_pool_size" => "db.replica.pool_size".into(),

          "db_enforce_tls" => "db.enforce_tls".into(),
          "db_timeout_secs" => "db.timeout_secs".into(),

          _ => key.replace('_', ".").into(),
        }
      }))
      // Environment variable aliases
      .merge(
        Env::raw()
          .only(&["DATABASE_URL"])
          .map(|_| "db.primary.url".into()),
      )
  }

  fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
  }

  const fn default_port() -> u16 {
    Self::DEFAULT_PORT
  }

  fn default_workers() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
  }
}
