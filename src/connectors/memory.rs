// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process connectors.
//!
//! All four roles share a [`MemoryLedger`], so a wallet built for one request
//! sees the addresses provisioned by an earlier request with the same
//! mnemonic id. Addresses and DID identifiers are derived with SHA-256 and
//! are stable for a given input; vault keys are real Ed25519 keys.
//!
//! Nothing is published to a ledger. Use this backend for local development
//! and tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{
    ConnectorError, ConnectorFactory, DidDocument, FaucetConnector, FaucetSettings,
    IdentityConnector, IdentitySettings, VaultConnector, VaultKey, VaultKeyType, WalletConnector,
    WalletSettings,
};
use crate::config::{Network, VaultConfig};

/// A funding request accepted by the in-memory faucet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRecord {
    pub network: Network,
    pub identity: String,
    pub address: String,
    pub amount: u64,
}

#[derive(Default)]
struct LedgerState {
    /// (network, mnemonic id, identity)
    wallets: HashSet<(Network, String, String)>,
    documents: HashMap<String, DidDocument>,
    balances: HashMap<String, u64>,
    fundings: Vec<FundingRecord>,
    keys: HashMap<String, VaultKey>,
    faucet_rejection: Option<ConnectorError>,
}

/// Shared state behind the in-memory connectors.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn balance(&self, address: &str) -> u64 {
        self.lock().balances.get(address).copied().unwrap_or(0)
    }

    pub fn fundings(&self) -> Vec<FundingRecord> {
        self.lock().fundings.clone()
    }

    pub fn document(&self, did: &str) -> Option<DidDocument> {
        self.lock().documents.get(did).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Make every subsequent faucet request fail with `error`.
    pub fn reject_fundings(&self, error: Option<ConnectorError>) {
        self.lock().faucet_rejection = error;
    }

    /// Store a key directly, bypassing key generation.
    pub fn insert_key(&self, name: impl Into<String>, key: VaultKey) {
        self.lock().keys.insert(name.into(), key);
    }
}

fn digest_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

// =============================================================================
// Wallet
// =============================================================================

pub struct MemoryWalletConnector {
    settings: WalletSettings,
    ledger: MemoryLedger,
}

impl MemoryWalletConnector {
    pub fn new(settings: WalletSettings, ledger: MemoryLedger) -> Self {
        Self { settings, ledger }
    }

    fn wallet_key(&self, identity: &str) -> (Network, String, String) {
        (
            self.settings.network,
            self.settings.vault_mnemonic_id.clone(),
            identity.to_string(),
        )
    }

    fn derive_address(&self, identity: &str, account_index: u32, address_index: u32) -> String {
        let digest = digest_hex(&[
            self.settings.network.as_str().as_bytes(),
            &self.settings.coin_type.to_be_bytes(),
            self.settings.vault_seed_id.as_bytes(),
            self.settings.vault_mnemonic_id.as_bytes(),
            identity.as_bytes(),
            &account_index.to_be_bytes(),
            &address_index.to_be_bytes(),
        ]);
        format!("0x{digest}")
    }
}

#[async_trait]
impl WalletConnector for MemoryWalletConnector {
    async fn create(&self, identity: &str) -> Result<(), ConnectorError> {
        let created = self.ledger.lock().wallets.insert(self.wallet_key(identity));
        debug!(
            mnemonic_id = %self.settings.vault_mnemonic_id,
            created,
            "Memory wallet provisioned"
        );
        Ok(())
    }

    async fn get_addresses(
        &self,
        identity: &str,
        account_index: u32,
        start_address_index: u32,
        count: u32,
    ) -> Result<Vec<String>, ConnectorError> {
        if !self.ledger.lock().wallets.contains(&self.wallet_key(identity)) {
            return Err(ConnectorError::NotFound(format!(
                "wallet {} for {identity}",
                self.settings.vault_mnemonic_id
            )));
        }

        let end = start_address_index.saturating_add(count);
        Ok((start_address_index..end)
            .map(|index| self.derive_address(identity, account_index, index))
            .collect())
    }
}

// =============================================================================
// Identity
// =============================================================================

pub struct MemoryIdentityConnector {
    settings: IdentitySettings,
    ledger: MemoryLedger,
}

impl MemoryIdentityConnector {
    pub fn new(settings: IdentitySettings, ledger: MemoryLedger) -> Self {
        Self { settings, ledger }
    }

    fn did_prefix(&self) -> String {
        match self.settings.network {
            Network::Mainnet => "did:iota".to_string(),
            other => format!("did:iota:{other}"),
        }
    }
}

#[async_trait]
impl IdentityConnector for MemoryIdentityConnector {
    async fn create_document(&self, controller: &str) -> Result<DidDocument, ConnectorError> {
        let verification_key = SigningKey::generate(&mut OsRng).verifying_key();

        let mut state = self.ledger.lock();
        let sequence = state.documents.len() as u64;
        let object_id = digest_hex(&[
            self.settings.network.as_str().as_bytes(),
            self.settings.vault_mnemonic_id.as_bytes(),
            controller.as_bytes(),
            &sequence.to_be_bytes(),
        ]);
        let did = format!("{}:0x{object_id}", self.did_prefix());

        let mut document = DidDocument::new(did.clone());
        document.properties.insert(
            "@context".to_string(),
            json!(["https://www.w3.org/ns/did/v1"]),
        );
        document
            .properties
            .insert("controller".to_string(), Value::String(did.clone()));
        document.properties.insert(
            "verificationMethod".to_string(),
            json!([{
                "id": format!("{did}#key-1"),
                "type": "Ed25519VerificationKey2018",
                "controller": did,
                "publicKeyHex": hex::encode(verification_key.to_bytes()),
            }]),
        );

        state.documents.insert(did.clone(), document.clone());
        debug!(did = %did, "Memory DID document created");
        Ok(document)
    }
}

// =============================================================================
// Faucet
// =============================================================================

pub struct MemoryFaucetConnector {
    settings: FaucetSettings,
    ledger: MemoryLedger,
}

impl MemoryFaucetConnector {
    pub fn new(settings: FaucetSettings, ledger: MemoryLedger) -> Self {
        Self { settings, ledger }
    }
}

#[async_trait]
impl FaucetConnector for MemoryFaucetConnector {
    async fn fund_address(
        &self,
        identity: &str,
        address: &str,
        amount: u64,
    ) -> Result<(), ConnectorError> {
        let mut state = self.ledger.lock();
        if let Some(error) = &state.faucet_rejection {
            return Err(error.clone());
        }

        *state.balances.entry(address.to_string()).or_default() += amount;
        state.fundings.push(FundingRecord {
            network: self.settings.network,
            identity: identity.to_string(),
            address: address.to_string(),
            amount,
        });
        Ok(())
    }
}

// =============================================================================
// Vault
// =============================================================================

pub struct MemoryVaultConnector {
    ledger: MemoryLedger,
}

impl MemoryVaultConnector {
    pub fn new(ledger: MemoryLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl VaultConnector for MemoryVaultConnector {
    async fn get_key(&self, name: &str) -> Result<VaultKey, ConnectorError> {
        self.ledger
            .lock()
            .keys
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound(format!("key {name}")))
    }

    async fn create_key(
        &self,
        name: &str,
        key_type: VaultKeyType,
    ) -> Result<Vec<u8>, ConnectorError> {
        let mut state = self.ledger.lock();
        if state.keys.contains_key(name) {
            return Err(ConnectorError::AlreadyExists(format!("key {name}")));
        }

        let signing_key = match key_type {
            VaultKeyType::Ed25519 => SigningKey::generate(&mut OsRng),
        };
        let public_key = signing_key.verifying_key().to_bytes().to_vec();
        state.keys.insert(
            name.to_string(),
            VaultKey {
                key_type,
                public_key: Some(public_key.clone()),
                private_key: signing_key.to_bytes().to_vec(),
            },
        );
        Ok(public_key)
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds in-memory connectors for every role.
#[derive(Clone, Default)]
pub struct MemoryConnectorFactory {
    ledger: MemoryLedger,
}

impl MemoryConnectorFactory {
    pub fn new(ledger: MemoryLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }
}

impl ConnectorFactory for MemoryConnectorFactory {
    fn wallet(
        &self,
        settings: &WalletSettings,
    ) -> Result<Arc<dyn WalletConnector>, ConnectorError> {
        Ok(Arc::new(MemoryWalletConnector::new(
            settings.clone(),
            self.ledger.clone(),
        )))
    }

    fn identity(
        &self,
        settings: &IdentitySettings,
    ) -> Result<Arc<dyn IdentityConnector>, ConnectorError> {
        Ok(Arc::new(MemoryIdentityConnector::new(
            settings.clone(),
            self.ledger.clone(),
        )))
    }

    fn faucet(
        &self,
        settings: &FaucetSettings,
    ) -> Result<Arc<dyn FaucetConnector>, ConnectorError> {
        Ok(Arc::new(MemoryFaucetConnector::new(
            settings.clone(),
            self.ledger.clone(),
        )))
    }

    fn vault(&self, _config: &VaultConfig) -> Result<Arc<dyn VaultConnector>, ConnectorError> {
        Ok(Arc::new(MemoryVaultConnector::new(self.ledger.clone())))
    }
}
