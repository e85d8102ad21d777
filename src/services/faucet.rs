// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Faucet connector lifecycle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::config::ConfigManager;
use crate::connectors::registry::FAUCET_CONNECTOR_NAME;
use crate::connectors::{ConnectorFactory, ConnectorRegistries, FaucetConnector, FaucetSettings};
use crate::error::ProvisioningError;

/// Owns the single faucet connector of the process.
///
/// Built on first request from the network that is active at that moment;
/// later network switches do not rebuild it.
pub struct FaucetService {
    config: Arc<ConfigManager>,
    factory: Arc<dyn ConnectorFactory>,
    registries: Arc<ConnectorRegistries>,
    connector: OnceCell<Arc<dyn FaucetConnector>>,
}

impl FaucetService {
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

    /// The faucet connector, built on first call.
    ///
    /// Fails with [`ProvisioningError::FaucetUnavailable`] on networks
    /// without a faucet endpoint.
    pub async fn connector(&self) -> Result<Arc<dyn FaucetConnector>, ProvisioningError> {
        self.connector
            .get_or_try_init(|| async { self.build() })
            .await
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.connector.initialized()
    }

    fn build(&self) -> Result<Arc<dyn FaucetConnector>, ProvisioningError> {
        let config = self.config.config()?;
        let endpoint = config
            .faucet_endpoint
            .ok_or(ProvisioningError::FaucetUnavailable {
                network: config.name,
            })?;

        let settings = FaucetSettings {
            node_endpoint: config.node_endpoint,
            network: config.name,
            endpoint,
        };
        let connector = self.factory.faucet(&settings)?;
        self.registries
            .faucets
            .register(FAUCET_CONNECTOR_NAME, connector.clone());

        info!(
            network = %settings.network,
            endpoint = %settings.endpoint,
            "Faucet connector initialized"
        );
        Ok(connector)
    }
}
