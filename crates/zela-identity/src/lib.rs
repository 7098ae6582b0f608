// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone identity resolution for the Zela conversational engine.
//!
//! Normalizes raw WhatsApp sender strings into a canonical phone form,
//! generates the bounded lookup-variant set, and resolves senders to
//! household members through the [`zela_core::Directory`] collaborator.
//! Resolution is a hard gate: unknown senders get no further processing.

pub mod phone;
pub mod resolver;

pub use phone::{normalize, variants};
pub use resolver::{IdentityResolver, Resolution};
