//! Human-readable startup messages on the diagnostic stream.
//!
//! Every line carries a severity glyph so operators can grep by severity.
//! Nothing here ever writes to stdout.

use crate::config::secrets::is_set;
use crate::config::{Config, ENV_TEMPLATE, SECRET_KEY_VAR};
use std::fmt::Display;
use std::io::{self, Write};

pub const DISPLAY_NAME: &str = "Liveblocks MCP Server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
    Info,
    Fatal,
}

impl Severity {
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::Error => "❌",
            Severity::Success => "✅",
            Severity::Info => "🔧",
            Severity::Fatal => "💥",
        }
    }
}

pub struct Diagnostics<W: Write = io::Stderr> {
    out: W,
}

impl Diagnostics<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Itemized list of missing variables plus remediation hints.
    pub fn missing_vars(&mut self, names: &[String]) {
        self.line(
            Severity::Error,
            format_args!("Missing required environment variables:"),
        );
        for name in names {
            self.raw(format_args!("  - {name}"));
        }
        self.raw(format_args!(
            "\nPlease check your .env file or set these environment variables."
        ));
        self.raw(format_args!(
            "You can copy {ENV_TEMPLATE} to .env and fill in your values."
        ));
    }

    /// Redacted configuration summary: secret presence and log level only.
    pub fn config_summary(&mut self, config: &Config) {
        let secret = if is_set(&config.liveblocks_secret_key) {
            "✅ Set"
        } else {
            "❌ Missing"
        };
        self.line(
            Severity::Info,
            format_args!("Environment configuration loaded:"),
        );
        self.raw(format_args!("  - {SECRET_KEY_VAR}: {secret}"));
        self.raw(format_args!("  - LOG_LEVEL: {}", config.log_level));
    }

    pub fn running(&mut self) {
        self.line(
            Severity::Success,
            format_args!("{DISPLAY_NAME} running on stdio"),
        );
    }

    pub fn start_failed(&mut self, err: &dyn Display) {
        self.line(
            Severity::Error,
            format_args!("Failed to start {DISPLAY_NAME}: {err}"),
        );
    }

    pub fn fatal(&mut self, err: &dyn Display) {
        self.line(Severity::Fatal, format_args!("Fatal error: {err}"));
    }

    fn line(&mut self, severity: Severity, msg: std::fmt::Arguments<'_>) {
        self.raw(format_args!("{} {msg}", severity.glyph()));
    }

    // A failed write to stderr has nowhere left to be reported.
    fn raw(&mut self, msg: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{msg}");
        let _ = self.out.flush();
    }
}
