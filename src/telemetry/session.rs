//! MCP session span helpers.

use tracing::Span;

/// Start a span covering one MCP session, from handshake to close.
///
/// The `mcp.session.end` field is declared empty and filled by
/// [`record_session_end`].
pub fn start_session_span(server: &str) -> Span {
    tracing::info_span!(
        "mcp.session",
        "mcp.server" = server,
        "mcp.session.end" = tracing::field::Empty,
    )
}

/// Record how the session ended on its span.
pub fn record_session_end(span: &Span, end: &str) {
    span.record("mcp.session.end", end);
    span.in_scope(|| {
        tracing::info!(end = end, "session ended");
    });
}
