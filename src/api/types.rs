//! Shared state for the API router.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::error::ApiError;
use crate::automation::{AutomationDashboard, WebhookConfig};
use crate::config::AppConfig;

/// Shared context for all API routes. Cloned per request; the mutable parts
/// sit behind `Arc<Mutex<..>>`.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub automation: Arc<Mutex<AutomationDashboard>>,
    pub webhook: Arc<Mutex<WebhookConfig>>,
}

impl ApiContext {
    /// Context with the default automation workflows.
    pub fn new(config: AppConfig) -> Self {
        Self::with_dashboard(config, AutomationDashboard::with_defaults())
    }

    pub fn with_dashboard(config: AppConfig, dashboard: AutomationDashboard) -> Self {
        Self {
            config: Arc::new(config),
            automation: Arc::new(Mutex::new(dashboard)),
            webhook: Arc::new(Mutex::new(WebhookConfig::default())),
        }
    }

    pub fn lock_automation(&self) -> Result<MutexGuard<'_, AutomationDashboard>, ApiError> {
        self.automation
            .lock()
            .map_err(|_| ApiError::Internal("automation lock poisoned".into()))
    }

    pub fn lock_webhook(&self) -> Result<MutexGuard<'_, WebhookConfig>, ApiError> {
        self.webhook
            .lock()
            .map_err(|_| ApiError::Internal("webhook lock poisoned".into()))
    }
}
