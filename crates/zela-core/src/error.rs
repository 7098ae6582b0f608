// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Zela conversational engine.

use thiserror::Error;

/// The primary error type used across all Zela collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum ZelaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Conversation state store errors (corrupt record, seed without identity).
    #[error("state store error: {source}")]
    State {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Directory lookup errors (backend unreachable, malformed identity payload).
    #[error("directory error: {message}")]
    Directory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Ledger errors (commit failure, summary fetch failure).
    #[error("ledger error: {message}")]
    Ledger {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound transport errors (provider API failure, invalid recipient).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
