//! Integration tests for the Liveblocks MCP server over an in-memory stdio pair.

use liveblocks_mcp::config::secrets::ExposeSecret;
use liveblocks_mcp::config::{Config, Environment, SECRET_KEY_VAR};
use liveblocks_mcp::error::Error;
use liveblocks_mcp::server::{Connection, LiveblocksServer, Server};
use liveblocks_mcp::transport::StdioTransport;
use rmcp::ServerHandler;
use rmcp::model::ProtocolVersion;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

fn test_config() -> Config {
    Config::from_environment(&Environment::from_pairs([(SECRET_KEY_VAR, "sk_test")])).unwrap()
}

fn test_server() -> LiveblocksServer {
    LiveblocksServer::new(&test_config())
}

/// Client side of an in-memory session.
struct Client {
    input: DuplexStream,
    output: BufReader<DuplexStream>,
}

impl Client {
    async fn send(&mut self, message: Value) {
        let mut line = serde_json::to_vec(&message).unwrap();
        line.push(b'\n');
        self.input.write_all(&line).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.output.read_line(&mut line).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    /// Run the handshake, asking for `version`; returns the initialize result.
    async fn initialize(&mut self, version: &str) -> Value {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": version,
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "0.0.0" }
            }
        }))
        .await;
        let response = self.recv().await;
        assert_eq!(response["id"], json!(1));

        self.send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        response["result"].clone()
    }
}

async fn connect() -> (Client, Connection) {
    let (client_in, server_in) = tokio::io::duplex(4096);
    let (server_out, client_out) = tokio::io::duplex(4096);
    let transport = StdioTransport::from_io(server_in, server_out);

    let connection = test_server().connect(transport).await.unwrap();
    let client = Client {
        input: client_in,
        output: BufReader::new(client_out),
    };
    (client, connection)
}

// ---------------------------------------------------------------------------
// Server info
// ---------------------------------------------------------------------------

#[test]
fn server_info_advertises_tools() {
    let info = test_server().get_info();

    assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
    assert_eq!(info.server_info.name, "liveblocks-mcp-server");
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    assert!(info.capabilities.tools.is_some());
}

#[test]
fn server_keeps_credential_but_redacts_it() {
    let server = test_server();

    assert_eq!(server.secret_key().expose_secret(), "sk_test");
    assert!(!format!("{server:?}").contains("sk_test"));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_answers_with_supported_protocol_version() {
    let (mut client, connection) = connect().await;

    let result = client.initialize("bogus-9999").await;

    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "liveblocks-mcp-server");
    assert!(result["capabilities"]["tools"].is_object());

    drop(client);
    connection.waiting().await.unwrap();
}

#[tokio::test]
async fn ping_and_tools_list_after_initialize() {
    let (mut client, connection) = connect().await;
    client.initialize("2024-11-05").await;

    client
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}))
        .await;
    let ping = client.recv().await;
    assert_eq!(ping["id"], json!(2));
    assert_eq!(ping["result"], json!({}));

    client
        .send(json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"}))
        .await;
    let tools = client.recv().await;
    assert_eq!(tools["id"], json!(3));
    assert_eq!(tools["result"]["tools"], json!([]));

    drop(client);
    connection.waiting().await.unwrap();
}

#[tokio::test]
async fn eof_before_initialize_ends_session_cleanly() {
    let (client, connection) = connect().await;

    drop(client);

    connection.waiting().await.unwrap();
}

#[test]
fn spawn_outside_runtime_is_a_connection_error() {
    let result = Connection::spawn(async { Ok::<(), Error>(()) });

    assert!(matches!(result, Err(Error::Connection(_))));
}
