//! # liveblocks-mcp
//!
//! Model Context Protocol server for the Liveblocks collaboration API.
//!
//! The crate is mostly startup plumbing: environment loading and validation,
//! a stdio transport, a server attach step, and deterministic reporting of
//! how startup went. Structured logs and OpenTelemetry export go to stderr
//! so stdout stays reserved for protocol traffic.

pub mod bootstrap;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod transport;
