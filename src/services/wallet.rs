// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-mnemonic wallet connectors.

use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigManager;
use crate::connectors::{ConnectorFactory, ConnectorRegistries, WalletConnector, WalletSettings};
use crate::error::ProvisioningError;

/// Seed id shared by every wallet derived by this service.
pub const VAULT_SEED_ID: &str = "default-seed";

/// Builds wallet connectors bound to a vault mnemonic id.
///
/// Nothing is cached: each call reads the current configuration and returns
/// a new connector, replacing any earlier registration under the same id.
#[derive(Clone)]
pub struct WalletService {
    config: Arc<ConfigManager>,
    factory: Arc<dyn ConnectorFactory>,
    registries: Arc<ConnectorRegistries>,
}

impl WalletService {
    pub fn new(
        config: Arc<ConfigManager>,
        factory: Arc<dyn ConnectorFactory>,
        registries: Arc<ConnectorRegistries>,
    ) -> Self {
        Self {
            config,
            factory,
            registries,
        }
    }

    pub fn create_wallet_connector(
        &self,
        vault_mnemonic_id: &str,
    ) -> Result<Arc<dyn WalletConnector>, ProvisioningError> {
        let config = self.config.config()?;
        let settings = WalletSettings {
            node_endpoint: config.node_endpoint,
            network: config.name,
            vault_mnemonic_id: vault_mnemonic_id.to_string(),
            vault_seed_id: VAULT_SEED_ID.to_string(),
            coin_type: config.coin_type,
        };

        let wallet = self.factory.wallet(&settings)?;
        self.registries
            .wallets
            .register(vault_mnemonic_id, wallet.clone());

        debug!(
            mnemonic_id = %vault_mnemonic_id,
            network = %settings.network,
            "Wallet connector created"
        );
        Ok(wallet)
    }
}
