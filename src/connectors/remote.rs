// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector factory for deployed environments.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::{
    hashicorp::{DEFAULT_KEY_PREFIX, DEFAULT_KV_MOUNT},
    memory::{MemoryIdentityConnector, MemoryWalletConnector},
    ConnectorError, ConnectorFactory, FaucetConnector, FaucetSettings, HashicorpVaultConnector,
    IdentityConnector, IdentitySettings, IotaFaucetConnector, MemoryLedger, VaultConnector,
    WalletConnector, WalletSettings,
};
use crate::config::{EnvSource, VaultConfig, VAULT_KEY_PREFIX_ENV, VAULT_KV_MOUNT_ENV};

/// Vault and faucet over HTTP; wallet and identity on a [`MemoryLedger`].
///
/// Ledger submission for wallets and DID documents belongs to the node
/// integration, which plugs in through its own [`ConnectorFactory`].
#[derive(Clone)]
pub struct RemoteConnectorFactory {
    http: Client,
    ledger: MemoryLedger,
    vault_mount: String,
    vault_prefix: String,
}

impl RemoteConnectorFactory {
    pub fn new(ledger: MemoryLedger) -> Result<Self, ConnectorError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConnectorError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, ledger))
    }

    /// Like [`new`](Self::new), with the vault key location read from
    /// `VAULT_KV_MOUNT` and `VAULT_KEY_PREFIX`.
    pub fn from_env(ledger: MemoryLedger, env: &dyn EnvSource) -> Result<Self, ConnectorError> {
        Ok(Self::new(ledger)?.with_vault_location(
            env.var_or(VAULT_KV_MOUNT_ENV, DEFAULT_KV_MOUNT),
            env.var_or(VAULT_KEY_PREFIX_ENV, DEFAULT_KEY_PREFIX),
        ))
    }

    pub fn with_client(http: Client, ledger: MemoryLedger) -> Self {
        Self {
            http,
            ledger,
            vault_mount: DEFAULT_KV_MOUNT.to_string(),
            vault_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    pub fn with_vault_location(
        mut self,
        mount: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.vault_mount = mount.into();
        self.vault_prefix = prefix.into();
        self
    }
}

impl ConnectorFactory for RemoteConnectorFactory {
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
        Ok(Arc::new(IotaFaucetConnector::new(
            settings.clone(),
            self.http.clone(),
        )?))
    }

    fn vault(&self, config: &VaultConfig) -> Result<Arc<dyn VaultConnector>, ConnectorError> {
        let connector = HashicorpVaultConnector::new(config, self.http.clone())?
            .with_location(&self.vault_mount, &self.vault_prefix);
        Ok(Arc::new(connector))
    }
}
