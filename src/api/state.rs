//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::models::SlipRegister;

/// Shared application state.
///
/// Carries the loaded payroll configuration and the slip register the
/// batch endpoint writes submitted slips into.
#[derive(Clone)]
pub struct AppState {
    /// The loaded payroll configuration.
    config: Arc<ConfigLoader>,
    /// Submitted slips, one per employee and period.
    register: Arc<RwLock<SlipRegister>>,
}

impl AppState {
    /// Creates a new application state with the given configuration
    /// loader and an empty slip register.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            register: Arc::new(RwLock::new(SlipRegister::new())),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared slip register.
    pub fn register(&self) -> &RwLock<SlipRegister> {
        &self.register
    }
}
