//! Metric instrument factories for liveblocks-mcp.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("liveblocks-mcp")
}

/// Counter: startup attempts.
/// Labels: `outcome` ("running" | "validation_failed" | "connect_error" | "fatal").
pub fn startup_outcomes() -> Counter<u64> {
    meter()
        .u64_counter("liveblocks_mcp.startup")
        .with_description("Number of startup attempts by outcome")
        .build()
}

/// Counter: finished MCP sessions.
/// Labels: `end` ("closed" | "closed_before_initialize" | "error").
pub fn sessions_ended() -> Counter<u64> {
    meter()
        .u64_counter("liveblocks_mcp.sessions")
        .with_description("Number of MCP sessions by how they ended")
        .build()
}
