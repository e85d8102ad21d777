// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IOTA faucet connector.
//!
//! Sends one `FixedAmountRequest` per funding call. The faucet decides how
//! much it dispenses; the requested amount is only logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::info;

use super::{ConnectorError, FaucetConnector, FaucetSettings};

const GAS_PATH: &str = "/v1/gas";

#[derive(Debug, Clone)]
pub struct IotaFaucetConnector {
    settings: FaucetSettings,
    request_url: String,
    http: Client,
}

impl IotaFaucetConnector {
    pub fn new(settings: FaucetSettings, http: Client) -> Result<Self, ConnectorError> {
        url::Url::parse(&settings.endpoint).map_err(|e| {
            ConnectorError::InvalidConfig(format!("faucet endpoint {}: {e}", settings.endpoint))
        })?;
        let request_url = gas_request_url(&settings.endpoint);

        Ok(Self {
            settings,
            request_url,
            http,
        })
    }

    pub fn from_settings(settings: FaucetSettings) -> Result<Self, ConnectorError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConnectorError::Request(format!("failed to build HTTP client: {e}")))?;
        Self::new(settings, http)
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }
}

/// Localnet faucets are configured with the full `/gas` path; hosted
/// faucets are configured with their base URL.
fn gas_request_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/gas") {
        trimmed.to_string()
    } else {
        format!("{trimmed}{GAS_PATH}")
    }
}

/// The faucet reports failures in an `error` member even on 2xx responses.
fn response_error(body: &Value) -> Option<String> {
    match body.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    }
}

#[async_trait]
impl FaucetConnector for IotaFaucetConnector {
    async fn fund_address(
        &self,
        identity: &str,
        address: &str,
        amount: u64,
    ) -> Result<(), ConnectorError> {
        let payload = json!({ "FixedAmountRequest": { "recipient": address } });

        let response = self
            .http
            .post(&self.request_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConnectorError::Request(format!("faucet request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ConnectorError::RateLimited(format!(
                "faucet for {} refused {address}",
                self.settings.network
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Request(format!(
                "faucet returned {status}: {body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("faucet response: {e}")))?;
        if let Some(message) = response_error(&body) {
            return Err(ConnectorError::Request(format!("faucet error: {message}")));
        }

        info!(
            network = %self.settings.network,
            identity = %identity,
            address = %address,
            requested = amount,
            "Faucet funding requested"
        );
        Ok(())
    }
}
