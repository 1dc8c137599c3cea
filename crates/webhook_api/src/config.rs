//! Process configuration for the webhook service, resolved once at startup.

/// Fixed development secret accepted when no secret is configured and the
/// runtime is a non-production environment.
pub const DEV_WEBHOOK_SECRET: &str = "orderhub_dev_webhook_secret_2025";

const DEV_ENVIRONMENTS: &[&str] = &["local", "development", "testing"];

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    secret: Option<String>,
    environment: String,
    /// When set, 500 responses carry the underlying error detail.
    pub debug: bool,
}

impl WebhookConfig {
    pub fn new(secret: Option<String>, environment: String, debug: bool) -> Self {
        Self {
            secret,
            environment,
            debug,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GATEWAY_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            std::env::var("APP_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        )
    }

    /// The shared secret webhook callers must present: the configured value,
    /// or the well-known development secret in non-production environments.
    /// None means the deployment is misconfigured and the webhook must fail
    /// closed.
    pub fn expected_secret(&self) -> Option<&str> {
        match &self.secret {
            Some(secret) => Some(secret.as_str()),
            None if DEV_ENVIRONMENTS.contains(&self.environment.as_str()) => {
                Some(DEV_WEBHOOK_SECRET)
            }
            None => None,
        }
    }
}
