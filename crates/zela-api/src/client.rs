// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP client for the SaaS backend internal API.
//!
//! All calls are bounded by the configured timeout and fail fast; retry and
//! backoff belong to the webhook transport layer, never here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use zela_config::model::BackendConfig;
use zela_core::{HealthStatus, ServiceAdapter, ZelaError};

/// Backend internal API client implementing the directory and ledger seams.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BackendClient {
    /// Build a client from the backend config section.
    pub fn new(config: &BackendConfig) -> Result<Self, ZelaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ZelaError::Config(format!("failed to build backend client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a JSON resource; `Ok(None)` on 404.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, reqwest::Error> {
        let response = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        Ok(Some(response.json::<T>().await?))
    }

    /// POST a JSON body and decode the JSON reply.
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, reqwest::Error> {
        let response = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        response.json::<T>().await
    }
}

#[async_trait]
impl ServiceAdapter for BackendClient {
    fn name(&self) -> &str {
        "backend-api"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        match self
            .authorize(self.http.get(self.url("/health")))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Degraded(format!(
                "backend health returned {}",
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("backend unreachable: {e}"))),
        }
    }
}
