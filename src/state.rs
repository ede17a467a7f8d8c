//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::relay::lead::LeadError;
use crate::relay::LeadNotifier;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration and the lead notifier used by
/// relay sessions to forward confirmed leads.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub leads: LeadNotifier,
}

impl AppState {
    /// Creates a new application state from the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, LeadError> {
        let leads = LeadNotifier::new(&config.relay)?;
        Ok(Self {
            config: Arc::new(config),
            leads,
        })
    }
}
