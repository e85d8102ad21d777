// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IOTA DID Service - DID onboarding orchestration
//!
//! Creates a funded IOTA address, a DID document and a vault-held
//! verification key pair for a user, by driving four connectors: wallet,
//! identity, faucet and secret store.
//!
//! ## Modules
//!
//! - `config` - Network presets and the configuration resolver
//! - `connectors` - Connector traits, registries and implementations
//! - `services` - Connector lifecycles and the onboarding orchestrator
//! - `api` - HTTP API handlers (Axum)
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod config;
pub mod connectors;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
