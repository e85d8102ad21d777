// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HashiCorp Vault connector.
//!
//! Keys live in the KV v2 secrets engine at
//! `/v1/{mount}/data/{prefix}/{name}` as hex-encoded Ed25519 key pairs.
//! Keys are generated in-process and written with `cas = 0`, so an existing
//! key is never overwritten.

use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use super::{ConnectorError, VaultConnector, VaultKey, VaultKeyType};
use crate::config::VaultConfig;

/// KV v2 mount used unless configured otherwise.
pub const DEFAULT_KV_MOUNT: &str = "secret";

/// Path under the mount that holds the keys.
pub const DEFAULT_KEY_PREFIX: &str = "keys";

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Key record as stored in the KV engine.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKey {
    #[serde(rename = "type")]
    key_type: VaultKeyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_key: Option<String>,
    private_key: String,
}

#[derive(Debug, Deserialize)]
struct KvReadResponse {
    data: KvReadData,
}

#[derive(Debug, Deserialize)]
struct KvReadData {
    data: StoredKey,
}

#[derive(Debug, Clone)]
pub struct HashicorpVaultConnector {
    base: Url,
    token: String,
    mount: String,
    prefix: String,
    http: Client,
}

impl HashicorpVaultConnector {
    pub fn new(config: &VaultConfig, http: Client) -> Result<Self, ConnectorError> {
        let base = Url::parse(&config.endpoint).map_err(|e| {
            ConnectorError::InvalidConfig(format!("vault endpoint {}: {e}", config.endpoint))
        })?;
        if base.cannot_be_a_base() {
            return Err(ConnectorError::InvalidConfig(format!(
                "vault endpoint {} is not a base URL",
                config.endpoint
            )));
        }
        if config.token.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "vault token is empty".to_string(),
            ));
        }

        Ok(Self {
            base,
            token: config.token.clone(),
            mount: DEFAULT_KV_MOUNT.to_string(),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            http,
        })
    }

    /// Build with a dedicated HTTP client.
    pub fn from_config(config: &VaultConfig) -> Result<Self, ConnectorError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ConnectorError::Request(format!("failed to build HTTP client: {e}")))?;
        Self::new(config, http)
    }

    /// Use a different KV mount and key prefix. Both may span several path
    /// segments (`team/kv`).
    pub fn with_location(mut self, mount: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.mount = mount.into();
        self.prefix = prefix.into();
        self
    }

    /// `{base}/v1/{mount}/data/{prefix}/{name}`, with `name` encoded as one
    /// path segment.
    fn key_url(&self, name: &str) -> Result<Url, ConnectorError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ConnectorError::InvalidConfig(format!(
                    "vault endpoint {} is not a base URL",
                    self.base
                ))
            })?;
            segments.pop_if_empty().push("v1");
            segments.extend(split_path(&self.mount));
            segments.push("data");
            segments.extend(split_path(&self.prefix));
            segments.push(name);
        }
        Ok(url)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, ConnectorError> {
    hex::decode(value)
        .map_err(|e| ConnectorError::InvalidResponse(format!("{field} is not valid hex: {e}")))
}

#[async_trait]
impl VaultConnector for HashicorpVaultConnector {
    async fn get_key(&self, name: &str) -> Result<VaultKey, ConnectorError> {
        let response = self
            .http
            .get(self.key_url(name)?)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| ConnectorError::Request(format!("vault read failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ConnectorError::NotFound(format!("key {name}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Request(format!(
                "vault read returned {status}: {body}"
            )));
        }

        let payload: KvReadResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("vault read: {e}")))?;
        let stored = payload.data.data;

        debug!(key = %name, "Vault key read");
        Ok(VaultKey {
            key_type: stored.key_type,
            public_key: stored
                .public_key
                .as_deref()
                .map(|value| decode_hex("publicKey", value))
                .transpose()?,
            private_key: decode_hex("privateKey", &stored.private_key)?,
        })
    }

    async fn create_key(
        &self,
        name: &str,
        key_type: VaultKeyType,
    ) -> Result<Vec<u8>, ConnectorError> {
        let signing_key = match key_type {
            VaultKeyType::Ed25519 => SigningKey::generate(&mut OsRng),
        };
        let public_key = signing_key.verifying_key().to_bytes().to_vec();
        let record = StoredKey {
            key_type,
            public_key: Some(hex::encode(&public_key)),
            private_key: hex::encode(signing_key.to_bytes()),
        };

        let response = self
            .http
            .post(self.key_url(name)?)
            .header(TOKEN_HEADER, &self.token)
            .json(&json!({ "options": { "cas": 0 }, "data": record }))
            .send()
            .await
            .map_err(|e| ConnectorError::Request(format!("vault write failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("check-and-set") {
                return Err(ConnectorError::AlreadyExists(format!("key {name}")));
            }
            return Err(ConnectorError::Request(format!(
                "vault write returned {status}: {body}"
            )));
        }

        info!(key = %name, key_type = %key_type, "Vault key created");
        Ok(public_key)
    }
}
