// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Network;
use crate::connectors::ConnectorError;

/// Errors raised while resolving configuration or provisioning an identity.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("No network selected. Call ConfigManager::use_network() first.")]
    NotConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No faucet available for network: {network}")]
    FaucetUnavailable { network: Network },

    #[error("Vault configuration missing. Please set a vault config in ConfigManager::use_network().")]
    SecretStoreNotConfigured,

    #[error("No address generated for {email}")]
    AddressGenerationFailed { email: String },

    #[error("Funding address {address} failed: {source}")]
    FundingFailed {
        address: String,
        #[source]
        source: ConnectorError,
    },

    #[error("Key retrieval for {key_id} failed: {source}")]
    KeyRetrievalFailed {
        key_id: String,
        #[source]
        source: ConnectorError,
    },

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<ProvisioningError> for ApiError {
    fn from(err: ProvisioningError) -> Self {
        let message = err.to_string();
        match err {
            ProvisioningError::UnknownNetwork(_) => Self::bad_request(message),
            ProvisioningError::NotConfigured
            | ProvisioningError::InvalidConfig(_)
            | ProvisioningError::FaucetUnavailable { .. }
            | ProvisioningError::SecretStoreNotConfigured => Self::service_unavailable(message),
            ProvisioningError::AddressGenerationFailed { .. }
            | ProvisioningError::FundingFailed { .. }
            | ProvisioningError::KeyRetrievalFailed { .. }
            | ProvisioningError::Connector(_) => Self::bad_gateway(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
