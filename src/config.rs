// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Network presets, vault connection settings and the [`ConfigManager`] that
//! resolves which of them is active. Configuration is either selected
//! explicitly with [`ConfigManager::use_network`] or derived from the
//! environment on first read, depending on the [`UnsetPolicy`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `IOTA_NETWORK` | Network preset (`mainnet`, `testnet`, `devnet`, `localnet`) | `testnet` |
//! | `VAULT_ENDPOINT` | HashiCorp Vault endpoint | `http://127.0.0.1:8200` |
//! | `VAULT_TOKEN` | HashiCorp Vault token | `test` |
//! | `VAULT_KV_MOUNT` | KV v2 mount holding the keys (remote backend) | `secret` |
//! | `VAULT_KEY_PREFIX` | Path under the mount for the keys (remote backend) | `keys` |
//! | `DOCKER_ENV` | Set to `true` when running in a container | unset |
//! | `IN_DOCKER` | Any non-empty value marks a container | unset |
//! | `DID_CONFIG_POLICY` | `auto` (derive from env) or `strict` (require explicit selection) | `auto` |
//! | `CONNECTOR_BACKEND` | `memory` or `remote` | `memory` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::ProvisioningError;

/// Environment variable selecting the network preset.
pub const NETWORK_ENV: &str = "IOTA_NETWORK";

/// Environment variable holding the vault endpoint URL.
pub const VAULT_ENDPOINT_ENV: &str = "VAULT_ENDPOINT";

/// Environment variable holding the vault token.
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// KV v2 mount used by the remote vault connector.
pub const VAULT_KV_MOUNT_ENV: &str = "VAULT_KV_MOUNT";

/// Key path under [`VAULT_KV_MOUNT_ENV`].
pub const VAULT_KEY_PREFIX_ENV: &str = "VAULT_KEY_PREFIX";

/// Explicit container flag (`"true"`).
pub const DOCKER_ENV: &str = "DOCKER_ENV";

/// Alternative container flag (any non-empty value).
pub const IN_DOCKER_ENV: &str = "IN_DOCKER";

/// Environment variable selecting the [`UnsetPolicy`].
pub const CONFIG_POLICY_ENV: &str = "DID_CONFIG_POLICY";

/// Environment variable selecting the connector backend.
pub const CONNECTOR_BACKEND_ENV: &str = "CONNECTOR_BACKEND";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Vault endpoint used when `VAULT_ENDPOINT` is absent.
pub const DEFAULT_VAULT_ENDPOINT: &str = "http://127.0.0.1:8200";

/// Vault token used when `VAULT_TOKEN` is absent.
pub const DEFAULT_VAULT_TOKEN: &str = "test";

/// Host/port pair of the vault container on the compose network.
pub const DOCKER_VAULT_HOST: &str = "vault:8200";

/// SLIP-44 coin type registered for IOTA.
pub const IOTA_COIN_TYPE: u32 = 4218;

// =============================================================================
// Network presets
// =============================================================================

/// Supported IOTA networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Devnet,
        Network::Localnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Static preset for this network.
    pub fn profile(&self) -> &'static NetworkProfile {
        match self {
            Network::Mainnet => &IOTA_MAINNET,
            Network::Testnet => &IOTA_TESTNET,
            Network::Devnet => &IOTA_DEVNET,
            Network::Localnet => &IOTA_LOCALNET,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ProvisioningError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == raw)
            .ok_or_else(|| ProvisioningError::UnknownNetwork(raw.to_string()))
    }
}

/// Endpoints and derivation parameters of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: Network,
    /// IOTA node JSON-RPC endpoint
    pub node_endpoint: &'static str,
    /// Faucet endpoint; mainnet has none
    pub faucet_endpoint: Option<&'static str>,
    /// Coin type for address derivation
    pub coin_type: u32,
}

pub const IOTA_MAINNET: NetworkProfile = NetworkProfile {
    name: Network::Mainnet,
    node_endpoint: "https://api.mainnet.iota.cafe",
    faucet_endpoint: None,
    coin_type: IOTA_COIN_TYPE,
};

pub const IOTA_TESTNET: NetworkProfile = NetworkProfile {
    name: Network::Testnet,
    node_endpoint: "https://api.testnet.iota.cafe",
    faucet_endpoint: Some("https://faucet.testnet.iota.cafe"),
    coin_type: IOTA_COIN_TYPE,
};

pub const IOTA_DEVNET: NetworkProfile = NetworkProfile {
    name: Network::Devnet,
    node_endpoint: "https://api.devnet.iota.cafe",
    faucet_endpoint: Some("https://faucet.devnet.iota.cafe"),
    coin_type: IOTA_COIN_TYPE,
};

pub const IOTA_LOCALNET: NetworkProfile = NetworkProfile {
    name: Network::Localnet,
    node_endpoint: "http://127.0.0.1:9000",
    faucet_endpoint: Some("http://127.0.0.1:9123/gas"),
    coin_type: IOTA_COIN_TYPE,
};

impl NetworkProfile {
    /// Look up a preset by its name (case-insensitive).
    pub fn lookup(name: &str) -> Result<&'static NetworkProfile, ProvisioningError> {
        name.parse::<Network>().map(|network| network.profile())
    }
}

// =============================================================================
// Active configuration
// =============================================================================

/// HashiCorp Vault connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VaultConfig {
    pub endpoint: String,
    pub token: String,
}

impl VaultConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

// The token never reaches logs.
impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The network preset in use plus optional vault settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub name: Network,
    pub node_endpoint: String,
    pub faucet_endpoint: Option<String>,
    pub coin_type: u32,
    pub vault: Option<VaultConfig>,
}

impl Configuration {
    fn from_profile(profile: &NetworkProfile, vault: Option<VaultConfig>) -> Self {
        Self {
            name: profile.name,
            node_endpoint: profile.node_endpoint.to_string(),
            faucet_endpoint: profile.faucet_endpoint.map(str::to_string),
            coin_type: profile.coin_type,
            vault,
        }
    }
}

/// Behaviour of [`ConfigManager::config`] before any network was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsetPolicy {
    /// Fail with [`ProvisioningError::NotConfigured`].
    Strict,
    /// Derive the configuration from the environment on first read.
    #[default]
    AutoConfigure,
}

impl FromStr for UnsetPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(UnsetPolicy::Strict),
            "auto" | "" => Ok(UnsetPolicy::AutoConfigure),
            other => Err(format!(
                "Unknown configuration policy `{other}` (expected `strict` or `auto`)"
            )),
        }
    }
}

// =============================================================================
// Environment access
// =============================================================================

/// Source of environment-style key/value settings.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    fn var_or(&self, key: &str, default: &str) -> String {
        self.var(key)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Holds the active [`Configuration`].
///
/// Shared behind an `Arc` by every service that needs network settings.
/// Selection is explicit ([`use_network`](Self::use_network)) or, under
/// [`UnsetPolicy::AutoConfigure`], performed lazily from the environment.
pub struct ConfigManager {
    current: RwLock<Option<Configuration>>,
    policy: UnsetPolicy,
    env: Arc<dyn EnvSource>,
}

impl ConfigManager {
    /// Resolver reading the process environment.
    pub fn new(policy: UnsetPolicy) -> Self {
        Self::with_env(policy, Arc::new(ProcessEnv))
    }

    pub fn with_env(policy: UnsetPolicy, env: Arc<dyn EnvSource>) -> Self {
        Self {
            current: RwLock::new(None),
            policy,
            env,
        }
    }

    /// Resolver whose policy comes from `DID_CONFIG_POLICY`.
    pub fn from_env(env: Arc<dyn EnvSource>) -> Result<Self, ProvisioningError> {
        let policy = env
            .var(CONFIG_POLICY_ENV)
            .unwrap_or_default()
            .parse::<UnsetPolicy>()
            .map_err(ProvisioningError::InvalidConfig)?;
        Ok(Self::with_env(policy, env))
    }

    pub fn policy(&self) -> UnsetPolicy {
        self.policy
    }

    /// Select the active network.
    ///
    /// When `vault` is `None`, the vault settings of the previous selection
    /// are kept.
    pub fn use_network(&self, network: Network, vault: Option<VaultConfig>) -> Configuration {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        let vault = vault.or_else(|| current.as_ref().and_then(|c| c.vault.clone()));
        let config = Configuration::from_profile(network.profile(), vault);
        *current = Some(config.clone());
        config
    }

    /// Select the active network by name.
    pub fn use_network_named(
        &self,
        name: &str,
        vault: Option<VaultConfig>,
    ) -> Result<Configuration, ProvisioningError> {
        let profile = NetworkProfile::lookup(name)?;
        Ok(self.use_network(profile.name, vault))
    }

    /// The active configuration, applying the [`UnsetPolicy`] when unset.
    pub fn config(&self) -> Result<Configuration, ProvisioningError> {
        {
            let current = self.current.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = &*current {
                return Ok(config.clone());
            }
        }

        match self.policy {
            UnsetPolicy::Strict => Err(ProvisioningError::NotConfigured),
            UnsetPolicy::AutoConfigure => Ok(self.auto_configure()),
        }
    }

    /// Whether a network has been selected.
    pub fn is_configured(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn auto_configure(&self) -> Configuration {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have configured while we waited for the lock.
        if let Some(config) = &*current {
            return config.clone();
        }

        let network = self.network_from_env();
        let vault = self.vault_config_from_env();
        info!(
            network = %network,
            vault_endpoint = %vault.endpoint,
            "Auto-configured from environment"
        );

        let config = Configuration::from_profile(network.profile(), Some(vault));
        *current = Some(config.clone());
        config
    }

    fn network_from_env(&self) -> Network {
        self.env
            .var(NETWORK_ENV)
            .and_then(|raw| raw.parse::<Network>().ok())
            .unwrap_or(Network::Testnet)
    }

    fn vault_config_from_env(&self) -> VaultConfig {
        VaultConfig {
            endpoint: self.env.var_or(VAULT_ENDPOINT_ENV, DEFAULT_VAULT_ENDPOINT),
            token: self.env.var_or(VAULT_TOKEN_ENV, DEFAULT_VAULT_TOKEN),
        }
    }

    /// Whether the process runs inside the container deployment.
    pub fn is_docker_environment(&self) -> bool {
        self.env.var(DOCKER_ENV).as_deref() == Some("true")
            || self
                .env
                .var(VAULT_ENDPOINT_ENV)
                .is_some_and(|endpoint| endpoint.contains(DOCKER_VAULT_HOST))
            || self
                .env
                .var(IN_DOCKER_ENV)
                .is_some_and(|flag| !flag.is_empty())
    }

    /// Clear the active configuration. Intended for tests.
    pub fn reset(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("policy", &self.policy)
            .field("configured", &self.is_configured())
            .finish()
    }
}
