use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::{Compact, Format, Full, Pretty, Writer};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Could not initialize logging")]
pub struct LoggingInitError;

/// Installs the global subscriber. Span traces are captured for
/// every error reported through the HTTP layer.
pub fn init(cfg: &Logging) -> Result<(), LoggingInitError> {
  let filter = EnvFilter::try_new(&cfg.filter)
    .change_context(LoggingInitError)
    .attach_printable_lazy(|| format!("invalid logging filter {:?}", cfg.filter))?;

  let layer = fmt::layer().event_format(Formatter::from_style(cfg.style, true));
  tracing_subscriber::registry()
    .with(filter)
    .with(layer)
    .with(ErrorLayer::default())
    .try_init()
    .change_context(LoggingInitError)
}

pub enum Formatter {
  Full(Format<Full, ChronoUtc>),
  Pretty(Format<Pretty, ChronoUtc>),
  Compact(Format<Compact, ChronoUtc>),
}

impl Formatter {
  const TIME_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.3fZ";

  #[must_use]
  pub fn from_style(style: LoggingStyle, ansi: bool) -> Self {
    let default = fmt::format().with_timer(ChronoUtc::new(Self::TIME_FORMAT.to_string()));
    match style {
      LoggingStyle::Compact => Self::Compact(default.compact().with_ansi(ansi)),
      LoggingStyle::Full => Self::Full(default.with_ansi(ansi)),
      LoggingStyle::Pretty => Self::Pretty(default.pretty().with_ansi(ansi)),
    }
  }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
  S: Subscriber + for<'a> LookupSpan<'a>,
  N: for<'a> FormatFields<'a> + 'static,
{
  fn format_event(
    &self,
    ctx: &FmtContext<'_, S, N>,
    writer: Writer<'_>,
    event: &Event<'_>,
  ) -> std::fmt::Result {
    match self {
      Formatter::Full(fmt) => fmt.format_event(ctx, writer, event),
      Formatter::Pretty(fmt) => fmt.format_event(ctx, writer, event),
      Formatter::Compact(fmt) => fmt.format_event(ctx, writer, event),
    }
  }
}
