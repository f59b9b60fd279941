//! Startup sequencing: validate, attach, report.
//!
//! [`start`] runs the ordered startup steps and returns a typed result; it
//! never terminates the process. [`finish`] is the single place that turns
//! a result into an exit status, and the binary's `main` is the only caller
//! that acts on it.

use crate::config::{Config, Environment};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::server::{Connection, Server};
use crate::telemetry::metrics;
use crate::transport::StdioTransport;
use opentelemetry::KeyValue;
use std::io::Write;
use tracing::{debug, info};

/// Terminal state of a startup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    ValidationFailed,
    ConnectError,
    Fatal,
}

impl Outcome {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Outcome::Running,
            Err(Error::ConfigurationMissing(_)) => Outcome::ValidationFailed,
            Err(Error::Connection(_)) => Outcome::ConnectError,
            Err(_) => Outcome::Fatal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Running => "running",
            Outcome::ValidationFailed => "validation_failed",
            Outcome::ConnectError => "connect_error",
            Outcome::Fatal => "fatal",
        }
    }

    /// Process exit status: 0 while running, 1 for every failure.
    pub fn exit_status(self) -> u8 {
        match self {
            Outcome::Running => 0,
            _ => 1,
        }
    }
}

/// Validate the environment and attach `make_server`'s server to stdio.
pub async fn start<S, F, W>(
    env: &Environment,
    make_server: F,
    diagnostics: &mut Diagnostics<W>,
) -> Result<Connection>
where
    S: Server,
    F: FnOnce(&Config) -> S,
    W: Write,
{
    start_with(env, make_server, StdioTransport::new, diagnostics).await
}

/// Like [`start`], with the transport supplied by `make_transport`.
///
/// # Errors
///
/// - [`Error::ConfigurationMissing`] listing every missing required variable.
/// - [`Error::Connection`] if the server fails to attach.
///
/// Both are written to `diagnostics` before returning.
pub async fn start_with<S, F, T, W>(
    env: &Environment,
    make_server: F,
    make_transport: T,
    diagnostics: &mut Diagnostics<W>,
) -> Result<Connection>
where
    S: Server,
    F: FnOnce(&Config) -> S,
    T: FnOnce() -> StdioTransport,
    W: Write,
{
    let result = sequence(env, make_server, make_transport, diagnostics).await;
    let outcome = Outcome::of(&result);
    metrics::startup_outcomes().add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    info!(outcome = outcome.as_str(), "startup finished");
    result
}

async fn sequence<S, F, T, W>(
    env: &Environment,
    make_server: F,
    make_transport: T,
    diagnostics: &mut Diagnostics<W>,
) -> Result<Connection>
where
    S: Server,
    F: FnOnce(&Config) -> S,
    T: FnOnce() -> StdioTransport,
    W: Write,
{
    let config = match Config::from_environment(env) {
        Ok(config) => config,
        Err(e) => {
            if let Error::ConfigurationMissing(ref missing) = e {
                debug!(missing = ?missing, "required environment variables not set");
                diagnostics.missing_vars(missing);
            }
            return Err(e);
        }
    };

    if config.debug {
        diagnostics.config_summary(&config);
    }
    debug!(log_level = %config.log_level, "configuration validated");

    let server = make_server(&config);
    let transport = make_transport();

    match server.connect(transport).await {
        Ok(connection) => {
            diagnostics.running();
            Ok(connection)
        }
        Err(e) => {
            debug!(error = %e, "server failed to attach");
            diagnostics.start_failed(&e);
            Err(Error::Connection(e.to_string()))
        }
    }
}

/// Map the final result of the process to an outcome.
///
/// Errors the sequencer already reported are not repeated; anything else
/// is written as a fatal error.
pub fn finish<W: Write>(result: Result<()>, diagnostics: &mut Diagnostics<W>) -> Outcome {
    match result {
        Ok(()) => Outcome::Running,
        Err(e) if e.is_reported() => Outcome::of::<()>(&Err(e)),
        Err(e) => {
            debug!(error = %e, "fatal error");
            diagnostics.fatal(&e);
            Outcome::Fatal
        }
    }
}
