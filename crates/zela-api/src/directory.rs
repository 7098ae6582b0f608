// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory implementation over the backend internal API.

use async_trait::async_trait;
use tracing::debug;

use zela_core::{Directory, Identity, ZelaError};

use crate::client::BackendClient;

#[async_trait]
impl Directory for BackendClient {
    async fn member_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError> {
        let identity: Option<Identity> = self
            .get_json(&format!("/identity/phone/{phone}"))
            .await
            .map_err(|e| ZelaError::Directory {
                message: format!("member lookup failed for {phone}"),
                source: Some(Box::new(e)),
            })?;

        if identity.is_some() {
            debug!(phone, "member phone matched");
        }
        Ok(identity)
    }

    async fn household_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError> {
        let identity: Option<Identity> = self
            .get_json(&format!("/households/identity/phone/{phone}"))
            .await
            .map_err(|e| ZelaError::Directory {
                message: format!("household lookup failed for {phone}"),
                source: Some(Box::new(e)),
            })?;

        if identity.is_some() {
            debug!(phone, "household contact phone matched");
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zela_config::model::BackendConfig;

    async fn client(server: &MockServer) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: server.uri(),
            api_token: Some("secret".to_string()),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn member_lookup_decodes_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity/phone/5511999990000"))
            .and(bearer_token("secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "member_id": "m1",
                "household_id": "h1",
                "role": "owner",
                "active": true,
                "household_active": true,
            })))
            .mount(&server)
            .await;

        let identity = client(&server)
            .await
            .member_by_phone("5511999990000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.member_id, "m1");
        assert!(identity.active);
    }

    #[tokio::test]
    async fn missing_phone_is_none_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity/phone/5511000000000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server)
            .await
            .member_by_phone("5511000000000")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn server_error_surfaces_as_directory_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(&server).await.member_by_phone("5511999990000").await;
        assert!(matches!(result, Err(ZelaError::Directory { .. })));
    }
}
