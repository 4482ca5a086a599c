//! Diagnostic logging via tracing-subscriber.
//!
//! Call [`init`] once at startup. Output goes to stderr so it never mixes
//! with replies printed on stdout. The chat transcript log lives in
//! [`crate::utils::logging`].

use tracing_subscriber::EnvFilter;

use thiserror::Error;

/// Checked before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "KURA_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log filter '{filter}' in {var}: {message}")]
    InvalidFilter {
        var: &'static str,
        filter: String,
        message: String,
    },

    #[error("failed to set subscriber: {0}")]
    Subscriber(String),
}

/// Builds the filter from the first non-empty of `KURA_LOG` and `RUST_LOG`,
/// falling back to [`DEFAULT_LOG_FILTER`].
pub fn build_filter(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<EnvFilter, LoggerError> {
    for var in [LOG_ENV_VAR, "RUST_LOG"] {
        let Some(filter) = lookup(var).filter(|value| !value.trim().is_empty()) else {
            continue;
        };
        return EnvFilter::try_new(filter.trim()).map_err(|err| LoggerError::InvalidFilter {
            var,
            filter,
            message: err.to_string(),
        });
    }
    Ok(EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init() -> Result<(), LoggerError> {
    let filter = build_filter(|var| std::env::var(var).ok())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))
}
