// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vault connector lifecycle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::config::ConfigManager;
use crate::connectors::registry::VAULT_CONNECTOR_NAME;
use crate::connectors::{ConnectorFactory, ConnectorRegistries, VaultConnector};
use crate::error::ProvisioningError;

/// Owns the single vault connector of the process.
///
/// The connector is built from the active configuration on first request
/// and registered as `"vault"`. Concurrent first requests build it once.
pub struct VaultService {
    config: Arc<ConfigManager>,
    factory: Arc<dyn ConnectorFactory>,
    registries: Arc<ConnectorRegistries>,
    connector: OnceCell<Arc<dyn VaultConnector>>,
}

impl VaultService {
    pub fn new(
        config: Arc<ConfigManager>,
        factory: Arc<dyn ConnectorFactory>,
        registries: Arc<ConnectorRegistries>,
    ) -> Self {
        Self {
            config,
            factory,
            registries,
            connector: OnceCell::new(),
        }
    }

    /// The vault connector, built on first call.
    ///
    /// Fails with [`ProvisioningError::SecretStoreNotConfigured`] when the
    /// active configuration carries no vault settings. A failed build is not
    /// cached.
    pub async fn connector(&self) -> Result<Arc<dyn VaultConnector>, ProvisioningError> {
        self.connector
            .get_or_try_init(|| async { self.build() })
            .await
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.connector.initialized()
    }

    fn build(&self) -> Result<Arc<dyn VaultConnector>, ProvisioningError> {
        let config = self.config.config()?;
        let vault_config = config
            .vault
            .ok_or(ProvisioningError::SecretStoreNotConfigured)?;

        let connector = self.factory.vault(&vault_config)?;
        self.registries
            .vaults
            .register(VAULT_CONNECTOR_NAME, connector.clone());

        info!(endpoint = %vault_config.endpoint, "Vault connector initialized");
        Ok(connector)
    }
}
