// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::Network, error::ApiError, state::AppState};

/// The active network. Vault credentials are never exposed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResponse {
    pub network: Network,
    pub node_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faucet_endpoint: Option<String>,
    pub coin_type: u32,
    pub vault_configured: bool,
}

#[utoipa::path(
    get,
    path = "/v1/network",
    tag = "Network",
    responses(
        (status = 200, body = NetworkResponse),
        (status = 503, description = "No network selected")
    )
)]
pub async fn get_network(State(state): State<AppState>) -> Result<Json<NetworkResponse>, ApiError> {
    let config = state.config().config()?;
    Ok(Json(NetworkResponse {
        network: config.name,
        node_endpoint: config.node_endpoint,
        faucet_endpoint: config.faucet_endpoint,
        coin_type: config.coin_type,
        vault_configured: config.vault.is_some(),
    }))
}
