use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::AutomationError;

/// Outbound webhook settings. Stored only; no request is ever issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl WebhookConfig {
    pub fn validate(&self) -> Result<(), AutomationError> {
        let url = self.url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| AutomationError::InvalidWebhook("URL must start with http:// or https://".into()))?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(AutomationError::InvalidWebhook("URL has no host".into()));
        }
        if let Some(token) = &self.bearer_token {
            if token.trim().is_empty() {
                return Err(AutomationError::InvalidWebhook("Bearer token is empty".into()));
            }
        }
        Ok(())
    }

    /// Token with all but the last four characters hidden. Tokens of four
    /// characters or fewer are hidden entirely.
    pub fn masked_token(&self) -> Option<String> {
        self.bearer_token.as_ref().map(|t| {
            let chars: Vec<char> = t.chars().collect();
            if chars.len() <= 4 {
                return "****".to_string();
            }
            let visible: String = chars[chars.len() - 4..].iter().collect();
            format!("****{visible}")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    pub latency_ms: u64,
}

/// Pretends to call the webhook: waits `delay`, then reports whether the
/// configuration would be usable. Failures are logged and returned.
pub async fn simulate_test_connection(config: &WebhookConfig, delay: Duration) -> ConnectionTest {
    let started = Instant::now();
    tokio::time::sleep(delay).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let outcome = if !config.enabled {
        Err("Webhook is disabled".to_string())
    } else {
        config.validate().map_err(|e| e.to_string())
    };

    match outcome {
        Ok(()) => {
            tracing::info!(url = %config.url, latency_ms, "Webhook test succeeded");
            ConnectionTest {
                success: true,
                message: "Connection successful".into(),
                latency_ms,
            }
        }
        Err(message) => {
            tracing::warn!(url = %config.url, error = %message, "Webhook test failed");
            ConnectionTest { success: false, message, latency_ms }
        }
    }
}
