// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Onboarding Data Models
//!
//! Inputs and results of the DID onboarding flow. All types serialize in
//! camelCase and derive `ToSchema` for the OpenAPI document.
//!
//! ## Defaults
//!
//! - `walletId` defaults to `<email>-wallet`
//! - `fundingAmount` defaults to [`DEFAULT_FUNDING_AMOUNT`]

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::connectors::DidDocument;

/// Tokens requested from the faucet when no amount is given.
pub const DEFAULT_FUNDING_AMOUNT: u64 = 60;

/// Wallet id used when the caller does not choose one.
pub fn default_wallet_id(email: &str) -> String {
    format!("{email}-wallet")
}

// =============================================================================
// Requests
// =============================================================================

/// Options for creating a funded DID.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDidOptions {
    /// Email address linked to the DID.
    pub email: String,
    /// Wallet identifier. Defaults to `<email>-wallet`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    /// Tokens to request from the faucet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_amount: Option<u64>,
}

impl CreateDidOptions {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            wallet_id: None,
            funding_amount: None,
        }
    }

    pub fn with_wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    pub fn with_funding_amount(mut self, amount: u64) -> Self {
        self.funding_amount = Some(amount);
        self
    }

    pub fn wallet_id(&self) -> String {
        self.wallet_id
            .clone()
            .unwrap_or_else(|| default_wallet_id(&self.email))
    }

    pub fn funding_amount(&self) -> u64 {
        self.funding_amount.unwrap_or(DEFAULT_FUNDING_AMOUNT)
    }
}

/// Options for creating a user with a DID and a verification key pair.
#[derive(Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserOptions {
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_amount: Option<u64>,
}

impl CreateUserOptions {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: role.into(),
            wallet_id: None,
            funding_amount: None,
        }
    }

    pub fn with_wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    /// The DID part of these options.
    pub fn did_options(&self) -> CreateDidOptions {
        CreateDidOptions {
            email: self.email.clone(),
            wallet_id: self.wallet_id.clone(),
            funding_amount: self.funding_amount,
        }
    }
}

impl fmt::Debug for CreateUserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserOptions")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("wallet_id", &self.wallet_id)
            .field("funding_amount", &self.funding_amount)
            .finish()
    }
}

// =============================================================================
// Results
// =============================================================================

/// A created DID with its funded address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDidResponse {
    /// The DID document as returned by the identity connector.
    #[schema(value_type = Object)]
    pub did_document: DidDocument,
    /// Funded ledger address.
    pub address: String,
    pub email: String,
}

/// Verification method key pair, hex-encoded.
#[derive(Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerMethodKeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl fmt::Debug for VerMethodKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerMethodKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// A user record ready to be stored by the caller.
#[derive(Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserWithKeyPair {
    pub email_address: String,
    pub password: String,
    pub role: String,
    /// DID of the user's identity document.
    pub identity: String,
    pub ver_method_key_pair: VerMethodKeyPair,
}

impl fmt::Debug for UserWithKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserWithKeyPair")
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("identity", &self.identity)
            .field("ver_method_key_pair", &self.ver_method_key_pair)
            .finish()
    }
}
