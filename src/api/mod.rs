// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Network,
    models::{
        CreateDidOptions, CreateDidResponse, CreateUserOptions, UserWithKeyPair, VerMethodKeyPair,
    },
    state::AppState,
};

pub mod dids;
pub mod health;
pub mod network;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/network", get(network::get_network))
        .route("/dids", post(dids::create_did))
        .route("/users", post(dids::create_user))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        network::get_network,
        dids::create_did,
        dids::create_user
    ),
    components(
        schemas(
            Network,
            CreateDidOptions,
            CreateDidResponse,
            CreateUserOptions,
            UserWithKeyPair,
            VerMethodKeyPair,
            network::NetworkResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Network", description = "Active network configuration"),
        (name = "Identity", description = "DID and user onboarding")
    )
)]
pub struct ApiDoc;
