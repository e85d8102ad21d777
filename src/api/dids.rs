// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    models::{CreateDidOptions, CreateDidResponse, CreateUserOptions, UserWithKeyPair},
    state::AppState,
};

fn require_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/v1/dids",
    request_body = CreateDidOptions,
    tag = "Identity",
    responses(
        (status = 201, body = CreateDidResponse),
        (status = 400, description = "Missing email"),
        (status = 502, description = "A connector failed"),
        (status = 503, description = "Network, faucet or vault not configured")
    )
)]
pub async fn create_did(
    State(state): State<AppState>,
    Json(request): Json<CreateDidOptions>,
) -> Result<(StatusCode, Json<CreateDidResponse>), ApiError> {
    require_email(&request.email)?;
    let created = state.services.did.create_iota_did(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserOptions,
    tag = "Identity",
    responses(
        (status = 201, body = UserWithKeyPair),
        (status = 400, description = "Missing email"),
        (status = 502, description = "A connector failed"),
        (status = 503, description = "Network, faucet or vault not configured")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserOptions>,
) -> Result<(StatusCode, Json<UserWithKeyPair>), ApiError> {
    require_email(&request.email)?;
    let user = state.services.did.create_user_with_did(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
