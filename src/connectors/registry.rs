// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Named connector lookup.
//!
//! Services publish the connectors they build here so that other code can
//! resolve "the vault connector" or "the wallet for `alice-wallet`" by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::{FaucetConnector, IdentityConnector, VaultConnector, WalletConnector};

/// Registry name of the vault connector.
pub const VAULT_CONNECTOR_NAME: &str = "vault";

/// Registry name of the faucet connector.
pub const FAUCET_CONNECTOR_NAME: &str = "faucet";

/// Name → connector map. Registering an existing name replaces the entry.
pub struct ConnectorRegistry<T: ?Sized> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> ConnectorRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, name: impl Into<String>, connector: Arc<T>) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into(), connector);
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for ConnectorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ConnectorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// One registry per connector role.
#[derive(Debug, Default)]
pub struct ConnectorRegistries {
    pub wallets: ConnectorRegistry<dyn WalletConnector>,
    pub identities: ConnectorRegistry<dyn IdentityConnector>,
    pub faucets: ConnectorRegistry<dyn FaucetConnector>,
    pub vaults: ConnectorRegistry<dyn VaultConnector>,
}

impl ConnectorRegistries {
    pub fn new() -> Self {
        Self::default()
    }
}
