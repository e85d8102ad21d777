// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DID onboarding orchestration.
//!
//! ## Flow
//!
//! 1. Build a wallet and an identity connector for the wallet id
//! 2. Provision the wallet and derive its first address
//! 3. Fund that address from the faucet
//! 4. Create the DID document
//! 5. (users only) fetch or create the Ed25519 verification key in the vault
//!
//! Steps run strictly in order and nothing is retried; the first failure
//! aborts the flow. The only recovered condition is a missing vault key,
//! which is created once and read again.

use std::sync::Arc;

use tracing::info;

use super::{FaucetService, IdentityService, VaultService, WalletService};
use crate::connectors::{VaultKey, VaultKeyType};
use crate::error::ProvisioningError;
use crate::models::{
    CreateDidOptions, CreateDidResponse, CreateUserOptions, UserWithKeyPair, VerMethodKeyPair,
};

pub struct DidService {
    wallets: WalletService,
    identities: IdentityService,
    faucet: Arc<FaucetService>,
    vault: Arc<VaultService>,
}

impl DidService {
    pub fn new(
        wallets: WalletService,
        identities: IdentityService,
        faucet: Arc<FaucetService>,
        vault: Arc<VaultService>,
    ) -> Self {
        Self {
            wallets,
            identities,
            faucet,
            vault,
        }
    }

    /// Create an IOTA DID for `options.email`, fund its address and return
    /// the DID document together with the address.
    pub async fn create_iota_did(
        &self,
        options: &CreateDidOptions,
    ) -> Result<CreateDidResponse, ProvisioningError> {
        let email = options.email.as_str();
        let wallet_id = options.wallet_id();
        let funding_amount = options.funding_amount();

        info!(email = %email, wallet_id = %wallet_id, "Creating IOTA DID");

        // The shared id ties the wallet keys to the DID keys.
        let wallet = self.wallets.create_wallet_connector(&wallet_id)?;
        let identity = self.identities.create_identity_connector(&wallet_id)?;

        info!(email = %email, "Step 1: creating wallet and generating address");
        wallet.create(email).await?;
        let address = wallet
            .get_addresses(email, 0, 0, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProvisioningError::AddressGenerationFailed {
                email: email.to_string(),
            })?;

        info!(
            email = %email,
            address = %address,
            amount = funding_amount,
            "Step 2: funding address"
        );
        let faucet = self.faucet.connector().await?;
        faucet
            .fund_address(email, &address, funding_amount)
            .await
            .map_err(|source| ProvisioningError::FundingFailed {
                address: address.clone(),
                source,
            })?;

        info!(email = %email, "Step 3: creating DID document");
        let did_document = identity.create_document(email).await?;

        info!(email = %email, did = %did_document.id, "IOTA DID created");
        Ok(CreateDidResponse {
            did_document,
            address,
            email: email.to_string(),
        })
    }

    /// Read the verification key for `wallet_id`, creating an Ed25519 key
    /// first if the vault has none.
    pub async fn get_ver_method_key_pair(
        &self,
        wallet_id: &str,
    ) -> Result<VerMethodKeyPair, ProvisioningError> {
        info!(wallet_id = %wallet_id, "Retrieving key pair from vault");
        let vault = self.vault.connector().await?;

        let key = match vault.get_key(wallet_id).await {
            Ok(key) => key,
            Err(e) if e.is_not_found() => {
                info!(wallet_id = %wallet_id, "Key not found, creating new Ed25519 key pair");
                vault.create_key(wallet_id, VaultKeyType::Ed25519).await?;
                vault.get_key(wallet_id).await.map_err(|source| {
                    ProvisioningError::KeyRetrievalFailed {
                        key_id: wallet_id.to_string(),
                        source,
                    }
                })?
            }
            Err(source) => {
                return Err(ProvisioningError::KeyRetrievalFailed {
                    key_id: wallet_id.to_string(),
                    source,
                })
            }
        };

        Ok(encode_key_pair(&key))
    }

    /// Create a DID and attach the wallet's verification key pair.
    pub async fn create_user_with_did(
        &self,
        options: &CreateUserOptions,
    ) -> Result<UserWithKeyPair, ProvisioningError> {
        let did_options = options.did_options();
        let wallet_id = did_options.wallet_id();

        let did = self.create_iota_did(&did_options).await?;
        let ver_method_key_pair = self.get_ver_method_key_pair(&wallet_id).await?;

        Ok(UserWithKeyPair {
            email_address: options.email.clone(),
            password: options.password.clone(),
            role: options.role.clone(),
            identity: did.did_document.id,
            ver_method_key_pair,
        })
    }
}

/// Lowercase hex, no prefix. A key stored without its public half reports
/// the private bytes in both fields.
fn encode_key_pair(key: &VaultKey) -> VerMethodKeyPair {
    let public = key.public_key.as_deref().unwrap_or(&key.private_key);
    VerMethodKeyPair {
        private_key: hex::encode(&key.private_key),
        public_key: hex::encode(public),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Network, VaultConfig};
    use crate::connectors::{ConnectorError, MemoryConnectorFactory, MemoryLedger};
    use crate::services::Services;
    use crate::test_support::{strict_config, StubFactory};

    fn vault_config() -> Option<VaultConfig> {
        Some(VaultConfig::new("http://127.0.0.1:8200", "test"))
    }

    fn services(network: Network, factory: Arc<StubFactory>) -> Services {
        Services::new(strict_config(network, vault_config()), factory)
    }

    fn ed25519_key(public: Option<Vec<u8>>, private: Vec<u8>) -> VaultKey {
        VaultKey {
            key_type: VaultKeyType::Ed25519,
            public_key: public,
            private_key: private,
        }
    }

    #[tokio::test]
    async fn create_iota_did_returns_address_and_document() {
        let factory = Arc::new(
            StubFactory::new()
                .with_addresses(&["addr1"])
                .with_document_id("did:example:1"),
        );
        let services = services(Network::Testnet, factory.clone());

        let result = services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap();

        assert_eq!(result.address, "addr1");
        assert_eq!(result.email, "a@x.com");
        assert_eq!(result.did_document.id, "did:example:1");

        assert_eq!(factory.wallet.create_calls(), 1);
        assert_eq!(
            factory.wallet.address_requests(),
            vec![("a@x.com".to_string(), 0, 0, 1)]
        );
        assert_eq!(
            factory.faucet.fundings(),
            vec![("a@x.com".to_string(), "addr1".to_string(), 60)]
        );
        assert_eq!(factory.identity.calls(), vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn wallet_and_identity_share_the_default_wallet_id() {
        let factory = Arc::new(StubFactory::new());
        let services = services(Network::Testnet, factory.clone());

        services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap();

        assert_eq!(
            factory.last_wallet_settings().map(|s| s.vault_mnemonic_id),
            Some("a@x.com-wallet".to_string())
        );
        assert_eq!(
            factory.last_identity_settings().map(|s| s.vault_mnemonic_id),
            Some("a@x.com-wallet".to_string())
        );
        assert!(services.registries.wallets.contains("a@x.com-wallet"));
    }

    #[tokio::test]
    async fn custom_wallet_id_and_amount_are_used() {
        let factory = Arc::new(StubFactory::new().with_addresses(&["0x9"]));
        let services = services(Network::Devnet, factory.clone());

        let options = CreateDidOptions::new("b@x.com")
            .with_wallet_id("b-custom")
            .with_funding_amount(5);
        services.did.create_iota_did(&options).await.unwrap();

        assert_eq!(
            factory.last_wallet_settings().map(|s| s.vault_mnemonic_id),
            Some("b-custom".to_string())
        );
        assert_eq!(
            factory.faucet.fundings(),
            vec![("b@x.com".to_string(), "0x9".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn no_address_aborts_before_funding_and_document() {
        let factory = Arc::new(StubFactory::new().with_addresses(&[]));
        let services = services(Network::Testnet, factory.clone());

        let err = services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap_err();

        assert!(
            matches!(
                err,
                ProvisioningError::AddressGenerationFailed { ref email } if email == "a@x.com"
            ),
            "{err:?}"
        );
        assert_eq!(factory.faucet.call_count(), 0);
        assert!(factory.identity.calls().is_empty());
    }

    #[tokio::test]
    async fn funding_failure_is_propagated_without_retry() {
        let factory = Arc::new(
            StubFactory::new()
                .with_faucet_error(ConnectorError::RateLimited("too many requests".into())),
        );
        let services = services(Network::Testnet, factory.clone());

        let err = services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap_err();

        assert!(
            matches!(
                err,
                ProvisioningError::FundingFailed {
                    source: ConnectorError::RateLimited(_),
                    ..
                }
            ),
            "{err:?}"
        );
        assert_eq!(factory.faucet.call_count(), 1);
        assert!(factory.identity.calls().is_empty());
    }

    #[tokio::test]
    async fn mainnet_fails_with_faucet_unavailable() {
        let factory = Arc::new(StubFactory::new());
        let services = services(Network::Mainnet, factory.clone());

        let err = services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::FaucetUnavailable {
                network: Network::Mainnet
            }
        ));
        assert!(factory.identity.calls().is_empty());
    }

    #[tokio::test]
    async fn wallet_errors_pass_through() {
        let factory = Arc::new(
            StubFactory::new()
                .with_wallet_error(ConnectorError::Request("node unreachable".into())),
        );
        let services = services(Network::Testnet, factory.clone());

        let err = services
            .did
            .create_iota_did(&CreateDidOptions::new("a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::Connector(ConnectorError::Request(_))
        ));
        assert_eq!(factory.faucet.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_key_is_created_once_and_hex_encoded() {
        let factory = Arc::new(StubFactory::new());
        factory.vault.push_get(Err(ConnectorError::NotFound("key".into())));
        factory
            .vault
            .push_get(Ok(ed25519_key(Some(vec![0x01, 0x02]), vec![0x0a, 0xff])));
        let services = services(Network::Testnet, factory.clone());

        let pair = services
            .did
            .get_ver_method_key_pair("a@x.com-wallet")
            .await
            .unwrap();

        assert_eq!(pair.private_key, "0aff");
        assert_eq!(pair.public_key, "0102");
        assert_eq!(
            factory.vault.created(),
            vec![("a@x.com-wallet".to_string(), VaultKeyType::Ed25519)]
        );
        assert_eq!(factory.vault.get_calls(), 2);
    }

    #[tokio::test]
    async fn existing_key_is_not_recreated() {
        let factory = Arc::new(StubFactory::new());
        factory
            .vault
            .push_get(Ok(ed25519_key(Some(vec![0xbe, 0xef]), vec![0x00, 0x01])));
        let services = services(Network::Testnet, factory.clone());

        let pair = services.did.get_ver_method_key_pair("w").await.unwrap();

        assert_eq!(pair.private_key, "0001");
        assert!(factory.vault.created().is_empty());
    }

    #[tokio::test]
    async fn other_vault_errors_are_not_swallowed() {
        let factory = Arc::new(StubFactory::new());
        factory
            .vault
            .push_get(Err(ConnectorError::Request("permission denied".into())));
        let services = services(Network::Testnet, factory.clone());

        let err = services.did.get_ver_method_key_pair("w").await.unwrap_err();

        assert!(
            matches!(
                err,
                ProvisioningError::KeyRetrievalFailed {
                    ref key_id,
                    source: ConnectorError::Request(_)
                } if key_id == "w"
            ),
            "{err:?}"
        );
        assert!(factory.vault.created().is_empty());
    }

    #[tokio::test]
    async fn second_miss_after_creation_propagates() {
        let factory = Arc::new(StubFactory::new());
        factory.vault.push_get(Err(ConnectorError::NotFound("key".into())));
        factory.vault.push_get(Err(ConnectorError::NotFound("key".into())));
        let services = services(Network::Testnet, factory.clone());

        let err = services.did.get_ver_method_key_pair("w").await.unwrap_err();

        assert!(matches!(err, ProvisioningError::KeyRetrievalFailed { .. }));
        assert_eq!(factory.vault.created().len(), 1);
    }

    #[tokio::test]
    async fn missing_vault_config_fails_key_lookup() {
        let factory = Arc::new(StubFactory::new());
        let services = Services::new(strict_config(Network::Testnet, None), factory);

        let err = services.did.get_ver_method_key_pair("w").await.unwrap_err();
        assert!(matches!(err, ProvisioningError::SecretStoreNotConfigured));
    }

    #[tokio::test]
    async fn create_user_pairs_did_id_with_key_pair() {
        let factory = Arc::new(StubFactory::new().with_document_id("did:example:42"));
        factory.vault.push_get(Err(ConnectorError::NotFound("key".into())));
        factory
            .vault
            .push_get(Ok(ed25519_key(Some(vec![0xab]), vec![0x0a, 0xff])));
        let services = services(Network::Testnet, factory.clone());

        let user = services
            .did
            .create_user_with_did(
                &CreateUserOptions::new("u@x.com", "1234", "organization")
                    .with_wallet_id("user-wallet"),
            )
            .await
            .unwrap();

        assert_eq!(user.email_address, "u@x.com");
        assert_eq!(user.password, "1234");
        assert_eq!(user.role, "organization");
        assert_eq!(user.identity, "did:example:42");
        assert_eq!(user.ver_method_key_pair.private_key, "0aff");
        assert_eq!(user.ver_method_key_pair.public_key, "ab");
        assert_eq!(
            factory.vault.created(),
            vec![("user-wallet".to_string(), VaultKeyType::Ed25519)]
        );
    }

    #[test]
    fn key_without_public_part_reuses_private_bytes() {
        let pair = encode_key_pair(&ed25519_key(None, vec![0x0a, 0xff]));
        assert_eq!(pair.public_key, "0aff");
        assert_eq!(pair.private_key, "0aff");
    }

    #[test]
    fn hex_encoding_round_trips() {
        let samples: [&[u8]; 5] = [&[], &[0x00], &[0x00, 0x00, 0x01], &[0x0a, 0xff], &[0xff; 32]];
        for bytes in samples {
            let pair = encode_key_pair(&ed25519_key(Some(bytes.to_vec()), bytes.to_vec()));
            assert_eq!(pair.private_key.len(), bytes.len() * 2);
            assert_eq!(pair.private_key, pair.private_key.to_lowercase());
            assert_eq!(hex::decode(&pair.private_key).unwrap(), bytes);
            assert_eq!(hex::decode(&pair.public_key).unwrap(), bytes);
        }
        let leading_zero = encode_key_pair(&ed25519_key(None, vec![0x00, 0x10]));
        assert!(leading_zero.private_key.starts_with("00"));
    }

    #[tokio::test]
    async fn end_to_end_with_memory_connectors() {
        let ledger = MemoryLedger::new();
        let services = Services::new(
            strict_config(Network::Localnet, vault_config()),
            Arc::new(MemoryConnectorFactory::new(ledger.clone())),
        );

        let user = services
            .did
            .create_user_with_did(&CreateUserOptions::new("e2e@x.com", "pw", "admin"))
            .await
            .unwrap();

        assert!(user.identity.starts_with("did:iota:localnet:0x"));
        assert!(ledger.document(&user.identity).is_some());
        assert_eq!(user.ver_method_key_pair.private_key.len(), 64);
        assert_eq!(user.ver_method_key_pair.public_key.len(), 64);

        let fundings = ledger.fundings();
        assert_eq!(fundings.len(), 1);
        assert_eq!(fundings[0].amount, 60);
        assert_eq!(ledger.balance(&fundings[0].address), 60);

        // Second lookup returns the stored key instead of creating another.
        let again = services
            .did
            .get_ver_method_key_pair("e2e@x.com-wallet")
            .await
            .unwrap();
        assert_eq!(again, user.ver_method_key_pair);
    }
}
