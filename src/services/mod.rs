// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector services and the DID onboarding orchestrator.
//!
//! - [`VaultService`] and [`FaucetService`] build their connector once, on
//!   first use, and hand out the same instance afterwards.
//! - [`WalletService`] and [`IdentityService`] build a new connector per
//!   call, bound to a mnemonic id and the configuration at call time.
//! - [`DidService`] sequences wallet → faucet → identity → vault.
//!
//! [`Services`] wires all of them to one [`ConfigManager`], one
//! [`ConnectorFactory`] and one set of [`ConnectorRegistries`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ConfigManager;
use crate::connectors::{ConnectorFactory, ConnectorRegistries};

pub mod did;
pub mod faucet;
pub mod identity;
pub mod vault;
pub mod wallet;

pub use did::DidService;
pub use faucet::FaucetService;
pub use identity::IdentityService;
pub use vault::VaultService;
pub use wallet::WalletService;

/// Every service, sharing one configuration, factory and registry set.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<ConfigManager>,
    pub registries: Arc<ConnectorRegistries>,
    pub vault: Arc<VaultService>,
    pub faucet: Arc<FaucetService>,
    pub did: Arc<DidService>,
}

impl Services {
    pub fn new(config: Arc<ConfigManager>, factory: Arc<dyn ConnectorFactory>) -> Self {
        let registries = Arc::new(ConnectorRegistries::new());

        let vault = Arc::new(VaultService::new(
            config.clone(),
            factory.clone(),
            registries.clone(),
        ));
        let faucet = Arc::new(FaucetService::new(
            config.clone(),
            factory.clone(),
            registries.clone(),
        ));
        let wallets = WalletService::new(config.clone(), factory.clone(), registries.clone());
        let identities = IdentityService::new(config.clone(), factory, registries.clone());
        let did = Arc::new(DidService::new(
            wallets,
            identities,
            faucet.clone(),
            vault.clone(),
        ));

        Self {
            config,
            registries,
            vault,
            faucet,
            did,
        }
    }

    /// Build the vault and faucet connectors ahead of the first request.
    ///
    /// Failures are logged and left for the first request to report again;
    /// a mainnet deployment has no faucet, for example.
    pub async fn warm_up(&self) {
        match self.vault.connector().await {
            Ok(_) => info!("Vault connector ready"),
            Err(e) => warn!(error = %e, "Vault connector unavailable"),
        }
        match self.faucet.connector().await {
            Ok(_) => info!("Faucet connector ready"),
            Err(e) => warn!(error = %e, "Faucet connector unavailable"),
        }
    }
}
