// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Zela conversational engine.
//!
//! Takes free-text WhatsApp messages and turns them into confirmed financial
//! transactions and appointments, with a mandatory two-phase
//! confirm-before-write protocol: nothing reaches durable storage without an
//! explicit "confirmar".
//!
//! The engine is wired from constructor-injected collaborators
//! ([`zela_core::Directory`], [`zela_core::Ledger`], [`zela_core::StateStore`])
//! and is fully testable against in-memory fakes.

pub mod confirm;
pub mod orchestrator;
pub mod report;
pub mod reply;

pub use confirm::{ConfirmationFlow, FlowReply};
pub use orchestrator::{EngineOptions, MessageOrchestrator};
