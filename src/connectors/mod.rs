// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External connector interfaces.
//!
//! The onboarding flow talks to four collaborators:
//! - a wallet connector (address provisioning)
//! - an identity connector (DID document creation)
//! - a faucet connector (test-network funding)
//! - a vault connector (verification key storage)
//!
//! Each is a trait object built by a [`ConnectorFactory`] from the active
//! configuration. Two factories ship with the crate: [`MemoryConnectorFactory`]
//! keeps everything in-process, [`RemoteConnectorFactory`] talks to HashiCorp
//! Vault and the IOTA faucet over HTTP.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{Network, VaultConfig};

pub mod faucet;
pub mod hashicorp;
pub mod memory;
pub mod registry;
pub mod remote;

pub use faucet::IotaFaucetConnector;
pub use hashicorp::HashicorpVaultConnector;
pub use memory::{MemoryConnectorFactory, MemoryLedger};
pub use remote::RemoteConnectorFactory;
pub use registry::{ConnectorRegistries, ConnectorRegistry};

/// Errors reported by connector implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid connector configuration: {0}")]
    InvalidConfig(String),
}

impl ConnectorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConnectorError::NotFound(_))
    }
}

// =============================================================================
// Data exchanged with connectors
// =============================================================================

/// A W3C DID document.
///
/// Only `id` is interpreted here; every other member is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidDocument {
    pub id: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DidDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Map::new(),
        }
    }
}

/// Key algorithms a vault can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultKeyType {
    Ed25519,
}

impl fmt::Display for VaultKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultKeyType::Ed25519 => f.write_str("Ed25519"),
        }
    }
}

/// Raw key material held by the vault.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKey {
    pub key_type: VaultKeyType,
    pub public_key: Option<Vec<u8>>,
    pub private_key: Vec<u8>,
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultKey")
            .field("key_type", &self.key_type)
            .field("public_key", &self.public_key.as_ref().map(hex::encode))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Connector traits
// =============================================================================

#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Provision the wallet for `identity`.
    async fn create(&self, identity: &str) -> Result<(), ConnectorError>;

    /// Derive `count` addresses starting at `start_address_index`.
    async fn get_addresses(
        &self,
        identity: &str,
        account_index: u32,
        start_address_index: u32,
        count: u32,
    ) -> Result<Vec<String>, ConnectorError>;
}

#[async_trait]
pub trait IdentityConnector: Send + Sync {
    /// Create and publish a DID document controlled by `controller`.
    async fn create_document(&self, controller: &str) -> Result<DidDocument, ConnectorError>;
}

#[async_trait]
pub trait FaucetConnector: Send + Sync {
    /// Request `amount` tokens for `address` on behalf of `identity`.
    async fn fund_address(
        &self,
        identity: &str,
        address: &str,
        amount: u64,
    ) -> Result<(), ConnectorError>;
}

#[async_trait]
pub trait VaultConnector: Send + Sync {
    /// Read a key; fails with [`ConnectorError::NotFound`] when absent.
    async fn get_key(&self, name: &str) -> Result<VaultKey, ConnectorError>;

    /// Create a key and return its public part.
    async fn create_key(&self, name: &str, key_type: VaultKeyType)
        -> Result<Vec<u8>, ConnectorError>;
}

// =============================================================================
// Construction
// =============================================================================

/// Settings for a wallet connector bound to one mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSettings {
    pub node_endpoint: String,
    pub network: Network,
    pub vault_mnemonic_id: String,
    pub vault_seed_id: String,
    pub coin_type: u32,
}

/// Settings for an identity connector bound to one mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    pub node_endpoint: String,
    pub network: Network,
    pub vault_mnemonic_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetSettings {
    pub node_endpoint: String,
    pub network: Network,
    pub endpoint: String,
}

/// Builds connectors for each role.
///
/// Construction is synchronous and performs no I/O; connectors reach their
/// backends lazily on first use.
pub trait ConnectorFactory: Send + Sync {
    fn wallet(&self, settings: &WalletSettings) -> Result<Arc<dyn WalletConnector>, ConnectorError>;

    fn identity(
        &self,
        settings: &IdentitySettings,
    ) -> Result<Arc<dyn IdentityConnector>, ConnectorError>;

    fn faucet(&self, settings: &FaucetSettings) -> Result<Arc<dyn FaucetConnector>, ConnectorError>;

    fn vault(&self, config: &VaultConfig) -> Result<Arc<dyn VaultConnector>, ConnectorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn did_document_keeps_unknown_members() {
        let raw = json!({
            "id": "did:iota:testnet:0xabc",
            "verificationMethod": [{ "id": "did:iota:testnet:0xabc#key-1" }]
        });
        let doc: DidDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.id, "did:iota:testnet:0xabc");
        assert!(doc.properties.contains_key("verificationMethod"));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn vault_key_debug_hides_private_key() {
        let key = VaultKey {
            key_type: VaultKeyType::Ed25519,
            public_key: Some(vec![0xab]),
            private_key: vec![0xcd, 0xef],
        };
        let rendered = format!("{key:?}");
        assert!(rendered.contains("ab"));
        assert!(!rendered.contains("cdef"));
    }

    #[test]
    fn not_found_is_distinguished() {
        assert!(ConnectorError::NotFound("k".into()).is_not_found());
        assert!(!ConnectorError::Request("k".into()).is_not_found());
    }
}
