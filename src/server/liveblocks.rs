//! The Liveblocks MCP server.
//!
//! Protocol handling (framing, the `initialize` handshake, `ping`, error
//! replies) is done by `rmcp`. The server advertises tool support and holds
//! the Liveblocks credential for the tool layer, but registers no tools yet.

use crate::config::Config;
use crate::config::secrets::{ExposeSecret, SecretString};
use crate::error::{Error, Result};
use crate::server::{Connection, Server};
use crate::telemetry::metrics;
use crate::telemetry::session::{record_session_end, start_session_span};
use crate::transport::StdioTransport;
use opentelemetry::KeyValue;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::service::ServerInitializeError;
use rmcp::{ServerHandler, ServiceExt};
use tracing::{Instrument, debug, info};

pub const SERVER_NAME: &str = "liveblocks-mcp-server";

#[derive(Debug)]
pub struct LiveblocksServer {
    secret_key: SecretString,
}

impl LiveblocksServer {
    pub fn new(config: &Config) -> Self {
        Self {
            secret_key: SecretString::from(config.liveblocks_secret_key.expose_secret().to_string()),
        }
    }

    /// Credential used for Liveblocks API calls.
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    async fn run_session(self, transport: StdioTransport) -> Result<()> {
        let span = start_session_span(SERVER_NAME);
        let result = self.serve_until_closed(transport).instrument(span.clone()).await;

        let end = match &result {
            Ok(end) => *end,
            Err(_) => "error",
        };
        record_session_end(&span, end);
        metrics::sessions_ended().add(1, &[KeyValue::new("end", end)]);

        result.map(|_| ())
    }

    /// Run the handshake and the session; returns how the session ended.
    async fn serve_until_closed(self, transport: StdioTransport) -> Result<&'static str> {
        let service = match self.serve(transport.into_parts()).await {
            Ok(service) => service,
            // Client went away before initializing: nothing to serve.
            Err(ServerInitializeError::ConnectionClosed(_)) => {
                return Ok("closed_before_initialize");
            }
            Err(e) => return Err(Error::Session(format!("handshake failed: {e}"))),
        };
        info!("MCP session initialized");

        let quit = service
            .waiting()
            .await
            .map_err(|e| Error::Session(e.to_string()))?;
        debug!(reason = ?quit, "MCP session ended");
        Ok("closed")
    }
}

impl ServerHandler for LiveblocksServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            instructions: Some("Access to the Liveblocks collaboration API.".to_string()),
        }
    }
}

impl Server for LiveblocksServer {
    async fn connect(self, transport: StdioTransport) -> Result<Connection> {
        let connection = Connection::spawn(self.run_session(transport))?;
        info!(server = SERVER_NAME, "attached to transport");
        Ok(connection)
    }
}
