// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing transport fake.

use async_trait::async_trait;
use tokio::sync::Mutex;

use zela_core::{MessageTransport, ZelaError};

/// A sent message captured by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub phone: String,
    pub text: String,
}

/// In-memory [`MessageTransport`] that records every send.
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    accept: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            accept: Mutex::new(true),
        }
    }

    /// Make the provider report rejection for subsequent sends.
    pub async fn set_accept(&self, accept: bool) {
        *self.accept.lock().await = accept;
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send_text(&self, phone: &str, text: &str) -> Result<bool, ZelaError> {
        let accepted = *self.accept.lock().await;
        self.sent.lock().await.push(SentMessage {
            phone: phone.to_string(),
            text: text.to_string(),
        });
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_are_captured_in_order() {
        let transport = MockTransport::new();
        transport.send_text("111", "first").await.unwrap();
        transport.send_text("222", "second").await.unwrap();

        let sent = transport.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, "first");
        assert_eq!(sent[1].phone, "222");
    }

    #[tokio::test]
    async fn rejection_is_reported_but_still_recorded() {
        let transport = MockTransport::new();
        transport.set_accept(false).await;
        let accepted = transport.send_text("111", "oi").await.unwrap();
        assert!(!accepted);
        assert_eq!(transport.sent_count().await, 1);
    }
}
