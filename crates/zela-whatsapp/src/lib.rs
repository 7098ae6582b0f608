// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel for the Zela conversational engine.
//!
//! Webhook ingress (Cloud-API-shaped payloads, subscription verification)
//! and the outbound HTTP transport. The engine itself stays
//! transport-agnostic; this crate is the only place that knows the provider
//! wire format.

pub mod payload;
pub mod server;
pub mod transport;

pub use payload::{extract_text_messages, InboundText, WebhookPayload};
pub use server::{router, serve, IngressState};
pub use transport::HttpTransport;
