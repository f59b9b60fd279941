//! Typed configuration from environment variables.
//!
//! The process environment is captured once into an [`Environment`]
//! snapshot; [`Config`] is built only from that snapshot, so validation
//! never reads ambient state. The secret key is wrapped in
//! `secrecy::SecretString` to keep it out of logs.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the Liveblocks credential.
pub const SECRET_KEY_VAR: &str = "LIVEBLOCKS_SECRET_KEY";

/// Variables that must be present and non-empty before startup.
pub const REQUIRED_VARS: &[&str] = &[SECRET_KEY_VAR];

/// Template users are pointed at when required variables are missing.
pub const ENV_TEMPLATE: &str = ".env.example";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `name`, treating an empty string as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Every required variable that is absent or empty, in declaration order.
pub fn missing_vars(env: &Environment) -> Vec<String> {
    REQUIRED_VARS
        .iter()
        .filter(|name| env.get(name).is_none())
        .map(|name| name.to_string())
        .collect()
}

#[derive(Debug)]
pub struct Config {
    pub liveblocks_secret_key: SecretString,
    pub debug: bool,
    pub log_level: String,
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Build configuration from a snapshot.
    ///
    /// Call [`load_env_file`] before capturing the snapshot if a `.env`
    /// file should be honored.
    ///
    /// Fails with [`Error::ConfigurationMissing`] listing every missing
    /// required variable, not just the first.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let missing = missing_vars(env);
        if !missing.is_empty() {
            return Err(Error::ConfigurationMissing(missing));
        }

        Ok(Self {
            liveblocks_secret_key: SecretString::from(required_var(env, SECRET_KEY_VAR)?),
            debug: env.get("DEBUG") == Some("true"),
            log_level: env
                .get("LOG_LEVEL")
                .unwrap_or(DEFAULT_LOG_LEVEL)
                .to_string(),
            otel_endpoint: env.get("OTEL_ENDPOINT").map(str::to_string),
        })
    }
}

fn required_var(env: &Environment, name: &str) -> Result<String> {
    env.get(name)
        .map(str::to_string)
        .ok_or_else(|| Error::ConfigurationMissing(vec![name.to_string()]))
}

/// What happened when loading the environment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Absent,
    Unreadable(String),
}

impl EnvFile {
    /// Emit a tracing event describing the load.
    ///
    /// Loading happens before the subscriber exists, so the result is
    /// reported after telemetry is up.
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
            EnvFile::Absent => tracing::debug!("no environment file found"),
            EnvFile::Unreadable(reason) => {
                tracing::warn!(reason = %reason, "ignoring unreadable environment file")
            }
        }
    }
}

/// Load `KEY=value` pairs into the process environment.
///
/// Uses `path` when given, otherwise searches for `.env` from the current
/// directory upwards. Variables already set are not overwritten. Never
/// fails: a missing or malformed file only changes the returned variant.
pub fn load_env_file(path: Option<&Path>) -> EnvFile {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => EnvFile::Loaded(path),
        Err(e) if e.not_found() => EnvFile::Absent,
        Err(e) => EnvFile::Unreadable(e.to_string()),
    }
}
