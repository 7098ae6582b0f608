// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state store for the Zela conversational engine.
//!
//! Ephemeral per-sender state with two independent lifetimes: an absolute
//! TTL for the whole record and a shorter inactivity window that clears only
//! the pending confirmation. Backed by a per-key-locked map; durable data
//! never lives here.

pub mod store;
pub mod sweeper;

pub use store::MemoryStateStore;
pub use sweeper::spawn_sweeper;
