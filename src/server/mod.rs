//! Server attach seam.
//!
//! A [`Server`] takes ownership of a transport in `connect` and starts its
//! MCP session as a background task. The returned [`Connection`] owns that
//! task; the process stays alive for as long as someone awaits it.

pub mod liveblocks;

pub use liveblocks::LiveblocksServer;

use crate::error::{Error, Result};
use crate::transport::StdioTransport;
use std::future::Future;
use tokio::task::JoinHandle;

pub trait Server {
    /// Attach to `transport` and start serving.
    ///
    /// Resolves once the session task is running; fails with
    /// [`Error::Connection`] if it cannot be started.
    fn connect(self, transport: StdioTransport) -> impl Future<Output = Result<Connection>> + Send;
}

/// Handle to a running MCP session.
#[derive(Debug)]
pub struct Connection {
    task: JoinHandle<Result<()>>,
}

impl Connection {
    pub fn new(task: JoinHandle<Result<()>>) -> Self {
        Self { task }
    }

    /// Spawn `serve` on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when called outside a runtime.
    pub fn spawn<F>(serve: F) -> Result<Self>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Connection(format!("no async runtime to serve on: {e}")))?;
        Ok(Self::new(handle.spawn(serve)))
    }

    /// Wait for the session to end.
    pub async fn waiting(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(Error::Other(format!("session task panicked: {e}"))),
            Err(e) => Err(Error::Other(format!("session task aborted: {e}"))),
        }
    }
}
