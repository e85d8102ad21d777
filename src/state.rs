// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::{ConfigManager, UnsetPolicy};
use crate::connectors::{ConnectorFactory, MemoryConnectorFactory, MemoryLedger};
use crate::services::Services;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(config: Arc<ConfigManager>, factory: Arc<dyn ConnectorFactory>) -> Self {
        Self {
            services: Services::new(config, factory),
        }
    }

    pub fn config(&self) -> &ConfigManager {
        &self.services.config
    }
}

/// Auto-configured from the process environment, all connectors in memory.
impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(ConfigManager::new(UnsetPolicy::AutoConfigure)),
            Arc::new(MemoryConnectorFactory::new(MemoryLedger::new())),
        )
    }
}
