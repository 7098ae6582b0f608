// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API webhook payload types.
//!
//! Only text messages are surfaced; statuses, reactions, and media arrive in
//! the same envelope and are silently skipped.

use serde::Deserialize;

/// Top-level webhook envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: String,
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

/// One inbound text message flattened out of the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundText {
    pub from: String,
    pub message_id: String,
    pub text: String,
}

/// Flatten the envelope into the text messages it carries.
pub fn extract_text_messages(payload: &WebhookPayload) -> Vec<InboundText> {
    let mut out = Vec::new();
    for entry in &payload.entry {
        for change in &entry.changes {
            if change.field != "messages" {
                continue;
            }
            for message in &change.value.messages {
                if message.kind != "text" {
                    continue;
                }
                let Some(text) = &message.text else { continue };
                if message.from.is_empty() || text.body.trim().is_empty() {
                    continue;
                }
                out.push(InboundText {
                    from: message.from.clone(),
                    message_id: message.id.clone(),
                    text: text.body.clone(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "entry-1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": [
                        {
                            "from": "5511999990000",
                            "id": "wamid.1",
                            "type": "text",
                            "text": { "body": "Gastei R$ 50 no mercado" }
                        },
                        {
                            "from": "5511999990000",
                            "id": "wamid.2",
                            "type": "image"
                        }
                    ]
                }
            }]
        }]
    }"#;

    #[test]
    fn parses_and_flattens_text_messages() {
        let payload: WebhookPayload = serde_json::from_str(SAMPLE).unwrap();
        let messages = extract_text_messages(&payload);
        assert_eq!(messages.len(), 1, "non-text messages are skipped");
        assert_eq!(messages[0].from, "5511999990000");
        assert_eq!(messages[0].text, "Gastei R$ 50 no mercado");
        assert_eq!(messages[0].message_id, "wamid.1");
    }

    #[test]
    fn status_only_envelope_yields_nothing() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{
                    "id": "entry-1",
                    "changes": [{
                        "field": "statuses",
                        "value": { "messaging_product": "whatsapp" }
                    }]
                }]
            }"#,
        )
        .unwrap();
        assert!(extract_text_messages(&payload).is_empty());
    }

    #[test]
    fn empty_body_is_skipped() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "entry": [{
                    "changes": [{
                        "field": "messages",
                        "value": {
                            "messages": [{
                                "from": "5511999990000",
                                "id": "wamid.3",
                                "type": "text",
                                "text": { "body": "   " }
                            }]
                        }
                    }]
                }]
            }"#,
        )
        .unwrap();
        assert!(extract_text_messages(&payload).is_empty());
    }
}
