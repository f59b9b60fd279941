//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for reporting on secrets
//! without exposing them.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Whether a secret holds a non-empty value.
pub fn is_set(secret: &SecretString) -> bool {
    !secret.expose_secret().is_empty()
}
