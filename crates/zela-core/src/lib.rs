// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Zela conversational engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Zela workspace. The engine crates depend
//! on the seams defined here; the HTTP-facing crates implement them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ZelaError;
pub use types::{
    CommitId, ConversationState, Draft, DraftKind, EngineAction, HealthStatus, Identity,
    ProcessedMessage, StatePatch,
};

// Re-export all collaborator traits at crate root.
pub use traits::{Directory, Ledger, MessageTransport, ServiceAdapter, StateStore};
