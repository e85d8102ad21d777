// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-mnemonic identity connectors.

use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigManager;
use crate::connectors::{
    ConnectorFactory, ConnectorRegistries, IdentityConnector, IdentitySettings,
};
use crate::error::ProvisioningError;

/// Builds identity connectors bound to a vault mnemonic id.
///
/// Same lifecycle as [`WalletService`](super::WalletService): one new
/// connector per call, registered under the mnemonic id.
#[derive(Clone)]
pub struct IdentityService {
    config: Arc<ConfigManager>,
    factory: Arc<dyn ConnectorFactory>,
    registries: Arc<ConnectorRegistries>,
}

impl IdentityService {
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

    pub fn create_identity_connector(
        &self,
        vault_mnemonic_id: &str,
    ) -> Result<Arc<dyn IdentityConnector>, ProvisioningError> {
        let config = self.config.config()?;
        let settings = IdentitySettings {
            node_endpoint: config.node_endpoint,
            network: config.name,
            vault_mnemonic_id: vault_mnemonic_id.to_string(),
        };

        let identity = self.factory.identity(&settings)?;
        self.registries
            .identities
            .register(vault_mnemonic_id, identity.clone());

        debug!(
            mnemonic_id = %vault_mnemonic_id,
            network = %settings.network,
            "Identity connector created"
        );
        Ok(identity)
    }
}
