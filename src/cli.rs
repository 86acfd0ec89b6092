//! Plumbing shared by the two binaries: logging setup and the top-level
//! error boundary.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Error, HubError};

pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Exit status for a failed run, looking through any added context.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<Error>() {
        e.exit_code()
    } else if let Some(e) = error.downcast_ref::<HubError>() {
        e.exit_code()
    } else if let Some(e) = error.downcast_ref::<ConfigError>() {
        e.exit_code()
    } else {
        1
    }
}

/// Prints `error` and returns the matching exit status. With `verbose` the
/// whole cause chain is printed.
pub fn report_failure(error: &anyhow::Error, verbose: bool) -> ExitCode {
    tracing::debug!(?error, "run failed");
    if verbose {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {:#}", error);
    }
    ExitCode::from(exit_code(error))
}
