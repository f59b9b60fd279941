//! Error types for liveblocks-mcp.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required environment variables: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),

    #[error("{0}")]
    Connection(String),

    #[error("MCP session failed: {0}")]
    Session(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the bootstrap sequencer already wrote a diagnostic for this error.
    pub fn is_reported(&self) -> bool {
        matches!(self, Error::ConfigurationMissing(_) | Error::Connection(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
