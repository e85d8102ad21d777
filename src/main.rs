// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use iota_did_service::{
    api::router,
    config::{ConfigManager, EnvSource, ProcessEnv, CONNECTOR_BACKEND_ENV, HOST_ENV, PORT_ENV},
    connectors::{ConnectorFactory, MemoryConnectorFactory, MemoryLedger, RemoteConnectorFactory},
    logging::{self, LogFormat},
    state::AppState,
};
use tracing::{error, info, warn};

fn connector_factory(env: &dyn EnvSource) -> Result<Arc<dyn ConnectorFactory>, String> {
    let ledger = MemoryLedger::new();
    match env.var_or(CONNECTOR_BACKEND_ENV, "memory").trim() {
        "memory" => Ok(Arc::new(MemoryConnectorFactory::new(ledger))),
        "remote" => RemoteConnectorFactory::from_env(ledger, env)
            .map(|factory| Arc::new(factory) as Arc<dyn ConnectorFactory>)
            .map_err(|e| e.to_string()),
        other => Err(format!(
            "{CONNECTOR_BACKEND_ENV} must be 'memory' or 'remote', got '{other}'"
        )),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    let env = Arc::new(ProcessEnv);
    if let Err(e) = logging::init(LogFormat::from_env(env.as_ref())) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = match ConfigManager::from_env(env.clone()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    let factory = match connector_factory(env.as_ref()) {
        Ok(factory) => factory,
        Err(e) => {
            error!(error = %e, "Invalid connector backend");
            std::process::exit(1);
        }
    };

    info!(
        policy = ?config.policy(),
        docker = config.is_docker_environment(),
        "Starting IOTA DID service"
    );

    let state = AppState::new(config, factory);
    state.services.warm_up().await;
    let app = router(state);

    let host = env.var_or(HOST_ENV, "0.0.0.0");
    let port: u16 = env.var_or(PORT_ENV, "8080").parse().unwrap_or(8080);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(host = %host, port, error = %e, "Failed to parse bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(%addr, "IOTA DID service listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "HTTP server failed");
        std::process::exit(1);
    }
}
