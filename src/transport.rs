//! The byte streams an MCP service is attached to.
//!
//! Framing is left to `rmcp`; this only carries the reader/writer pair
//! so the attach step can be driven over process stdio or in memory.

use tokio::io::{AsyncRead, AsyncWrite};

pub type Reader = Box<dyn AsyncRead + Send + Unpin>;
pub type Writer = Box<dyn AsyncWrite + Send + Unpin>;

pub struct StdioTransport {
    reader: Reader,
    writer: Writer,
}

impl StdioTransport {
    /// Bind process stdin and stdout.
    pub fn new() -> Self {
        let (stdin, stdout) = rmcp::transport::stdio();
        Self::from_io(stdin, stdout)
    }

    /// Bind an arbitrary reader/writer pair.
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    pub fn into_parts(self) -> (Reader, Writer) {
        (self.reader, self.writer)
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}
