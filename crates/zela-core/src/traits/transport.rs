// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message transport trait.

use async_trait::async_trait;

use crate::error::ZelaError;

/// Fire-and-forget delivery of a computed response.
///
/// Delivery failure is reported upward but never rolls back engine state:
/// by the time `send_text` runs, the logical action (commit, clear, prompt)
/// has already happened.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Sends `text` to `phone`. Returns whether the provider accepted it.
    async fn send_text(&self, phone: &str, text: &str) -> Result<bool, ZelaError>;
}
