#![forbid(unsafe_code)]

//! Subscriber setup for binaries embedding Ridgeline.
//!
//! Library code only emits events (targets `ridgeline.snap`,
//! `ridgeline.scroll`, `ridgeline.lifecycle`); installing a subscriber is
//! the host's call. [`init`] reads `RUST_LOG` and falls back to
//! [`DEFAULT_FILTER`].

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn,ridgeline=info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line.
    #[cfg(feature = "tracing-json")]
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("global subscriber already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a stderr subscriber filtered by `RUST_LOG`.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };
    install(filter, format)
}

/// Install a stderr subscriber with an explicit filter such as
/// `"ridgeline.snap=debug"`.
pub fn init_with(directives: &str, format: LogFormat) -> Result<(), LoggingError> {
    install(EnvFilter::try_new(directives)?, format)
}

fn install(filter: EnvFilter, format: LogFormat) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()?,
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
    }
    Ok(())
}
