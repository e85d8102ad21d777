// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recording connector stubs shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{ConfigManager, Network, UnsetPolicy, VaultConfig};
use crate::connectors::{
    ConnectorError, ConnectorFactory, DidDocument, FaucetConnector, FaucetSettings,
    IdentityConnector, IdentitySettings, VaultConnector, VaultKey, VaultKeyType, WalletConnector,
    WalletSettings,
};

/// A strict-policy manager with `network` selected and no environment.
pub(crate) fn strict_config(network: Network, vault: Option<VaultConfig>) -> Arc<ConfigManager> {
    let env: HashMap<String, String> = HashMap::new();
    let config = ConfigManager::with_env(UnsetPolicy::Strict, Arc::new(env));
    config.use_network(network, vault);
    Arc::new(config)
}

// =============================================================================
// Connectors
// =============================================================================

pub(crate) struct StubWallet {
    addresses: Mutex<Vec<String>>,
    error: Mutex<Option<ConnectorError>>,
    create_calls: AtomicUsize,
    address_requests: Mutex<Vec<(String, u32, u32, u32)>>,
}

impl StubWallet {
    fn new() -> Self {
        Self {
            addresses: Mutex::new(vec!["addr1".to_string()]),
            error: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
            address_requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn address_requests(&self) -> Vec<(String, u32, u32, u32)> {
        self.address_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletConnector for StubWallet {
    async fn create(&self, _identity: &str) -> Result<(), ConnectorError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        match self.error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn get_addresses(
        &self,
        identity: &str,
        account_index: u32,
        start_address_index: u32,
        count: u32,
    ) -> Result<Vec<String>, ConnectorError> {
        self.address_requests.lock().unwrap().push((
            identity.to_string(),
            account_index,
            start_address_index,
            count,
        ));
        Ok(self.addresses.lock().unwrap().clone())
    }
}

pub(crate) struct StubIdentity {
    document_id: Mutex<String>,
    calls: Mutex<Vec<String>>,
}

impl StubIdentity {
    fn new() -> Self {
        Self {
            document_id: Mutex::new("did:example:1".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityConnector for StubIdentity {
    async fn create_document(&self, controller: &str) -> Result<DidDocument, ConnectorError> {
        self.calls.lock().unwrap().push(controller.to_string());
        Ok(DidDocument::new(self.document_id.lock().unwrap().clone()))
    }
}

pub(crate) struct StubFaucet {
    error: Mutex<Option<ConnectorError>>,
    fundings: Mutex<Vec<(String, String, u64)>>,
}

impl StubFaucet {
    fn new() -> Self {
        Self {
            error: Mutex::new(None),
            fundings: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fundings(&self) -> Vec<(String, String, u64)> {
        self.fundings.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.fundings.lock().unwrap().len()
    }
}

#[async_trait]
impl FaucetConnector for StubFaucet {
    async fn fund_address(
        &self,
        identity: &str,
        address: &str,
        amount: u64,
    ) -> Result<(), ConnectorError> {
        self.fundings
            .lock()
            .unwrap()
            .push((identity.to_string(), address.to_string(), amount));
        match self.error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Answers `get_key` from a queue; an empty queue reads as a missing key.
pub(crate) struct StubVault {
    gets: Mutex<VecDeque<Result<VaultKey, ConnectorError>>>,
    get_calls: AtomicUsize,
    created: Mutex<Vec<(String, VaultKeyType)>>,
}

impl StubVault {
    fn new() -> Self {
        Self {
            gets: Mutex::new(VecDeque::new()),
            get_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_get(&self, result: Result<VaultKey, ConnectorError>) {
        self.gets.lock().unwrap().push_back(result);
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn created(&self) -> Vec<(String, VaultKeyType)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl VaultConnector for StubVault {
    async fn get_key(&self, name: &str) -> Result<VaultKey, ConnectorError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ConnectorError::NotFound(format!("key {name}"))))
    }

    async fn create_key(
        &self,
        name: &str,
        key_type: VaultKeyType,
    ) -> Result<Vec<u8>, ConnectorError> {
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), key_type));
        Ok(vec![0u8; 32])
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Records every settings value it receives and hands out the shared stubs.
///
/// With [`StubFactory::fresh_connectors`] each wallet and identity build
/// returns a new instance instead.
pub(crate) struct StubFactory {
    pub wallet: Arc<StubWallet>,
    pub identity: Arc<StubIdentity>,
    pub faucet: Arc<StubFaucet>,
    pub vault: Arc<StubVault>,
    fresh: bool,
    wallet_settings: Mutex<Vec<WalletSettings>>,
    identity_settings: Mutex<Vec<IdentitySettings>>,
    faucet_settings: Mutex<Vec<FaucetSettings>>,
    vault_configs: Mutex<Vec<VaultConfig>>,
}

impl StubFactory {
    pub(crate) fn new() -> Self {
        Self {
            wallet: Arc::new(StubWallet::new()),
            identity: Arc::new(StubIdentity::new()),
            faucet: Arc::new(StubFaucet::new()),
            vault: Arc::new(StubVault::new()),
            fresh: false,
            wallet_settings: Mutex::new(Vec::new()),
            identity_settings: Mutex::new(Vec::new()),
            faucet_settings: Mutex::new(Vec::new()),
            vault_configs: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fresh_connectors() -> Self {
        Self {
            fresh: true,
            ..Self::new()
        }
    }

    pub(crate) fn with_addresses(self, addresses: &[&str]) -> Self {
        *self.wallet.addresses.lock().unwrap() =
            addresses.iter().map(|a| a.to_string()).collect();
        self
    }

    pub(crate) fn with_wallet_error(self, error: ConnectorError) -> Self {
        *self.wallet.error.lock().unwrap() = Some(error);
        self
    }

    pub(crate) fn with_document_id(self, id: &str) -> Self {
        *self.identity.document_id.lock().unwrap() = id.to_string();
        self
    }

    pub(crate) fn with_faucet_error(self, error: ConnectorError) -> Self {
        *self.faucet.error.lock().unwrap() = Some(error);
        self
    }

    pub(crate) fn wallet_builds(&self) -> usize {
        self.wallet_settings.lock().unwrap().len()
    }

    pub(crate) fn identity_builds(&self) -> usize {
        self.identity_settings.lock().unwrap().len()
    }

    pub(crate) fn faucet_builds(&self) -> usize {
        self.faucet_settings.lock().unwrap().len()
    }

    pub(crate) fn vault_builds(&self) -> usize {
        self.vault_configs.lock().unwrap().len()
    }

    pub(crate) fn last_wallet_settings(&self) -> Option<WalletSettings> {
        self.wallet_settings.lock().unwrap().last().cloned()
    }

    pub(crate) fn last_identity_settings(&self) -> Option<IdentitySettings> {
        self.identity_settings.lock().unwrap().last().cloned()
    }

    pub(crate) fn last_faucet_settings(&self) -> Option<FaucetSettings> {
        self.faucet_settings.lock().unwrap().last().cloned()
    }

    pub(crate) fn last_vault_config(&self) -> Option<VaultConfig> {
        self.vault_configs.lock().unwrap().last().cloned()
    }
}

impl ConnectorFactory for StubFactory {
    fn wallet(
        &self,
        settings: &WalletSettings,
    ) -> Result<Arc<dyn WalletConnector>, ConnectorError> {
        self.wallet_settings.lock().unwrap().push(settings.clone());
        if self.fresh {
            return Ok(Arc::new(StubWallet::new()));
        }
        Ok(self.wallet.clone())
    }

    fn identity(
        &self,
        settings: &IdentitySettings,
    ) -> Result<Arc<dyn IdentityConnector>, ConnectorError> {
        self.identity_settings.lock().unwrap().push(settings.clone());
        if self.fresh {
            return Ok(Arc::new(StubIdentity::new()));
        }
        Ok(self.identity.clone())
    }

    fn faucet(
        &self,
        settings: &FaucetSettings,
    ) -> Result<Arc<dyn FaucetConnector>, ConnectorError> {
        self.faucet_settings.lock().unwrap().push(settings.clone());
        Ok(self.faucet.clone())
    }

    fn vault(&self, config: &VaultConfig) -> Result<Arc<dyn VaultConnector>, ConnectorError> {
        self.vault_configs.lock().unwrap().push(config.clone());
        Ok(self.vault.clone())
    }
}
