// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message transport over the WhatsApp provider HTTP API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use zela_config::model::WhatsAppConfig;
use zela_core::{HealthStatus, MessageTransport, ServiceAdapter, ZelaError};

/// Provider send-message request body.
#[derive(Debug, Serialize)]
struct SendBody<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: SendText<'a>,
}

#[derive(Debug, Serialize)]
struct SendText<'a> {
    body: &'a str,
}

/// HTTP transport implementing [`MessageTransport`].
///
/// Fire-and-forget: a rejected send is reported as `Ok(false)` and logged;
/// engine state was already settled before this runs.
pub struct HttpTransport {
    http: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport from the whatsapp config section.
    ///
    /// Requires `whatsapp.api_url` to be set.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, ZelaError> {
        let api_url = config.api_url.clone().ok_or_else(|| {
            ZelaError::Config("whatsapp.api_url is required for the outbound transport".into())
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| ZelaError::Config(format!("failed to build transport client: {e}")))?;

        Ok(Self {
            http,
            api_url,
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl ServiceAdapter for HttpTransport {
    fn name(&self) -> &str {
        "whatsapp-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        if self.access_token.is_none() {
            return Ok(HealthStatus::Degraded(
                "no access token configured, sends will be rejected".into(),
            ));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send_text(&self, phone: &str, text: &str) -> Result<bool, ZelaError> {
        let body = SendBody {
            messaging_product: "whatsapp",
            to: phone,
            kind: "text",
            text: SendText { body: text },
        };

        let mut request = self.http.post(&self.api_url).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| ZelaError::Transport {
            message: format!("provider send failed for {phone}"),
            source: Some(Box::new(e)),
        })?;

        if response.status().is_success() {
            debug!(phone, "message accepted by provider");
            Ok(true)
        } else {
            warn!(phone, status = %response.status(), "provider rejected message");
            Ok(false)
        }
    }
}
