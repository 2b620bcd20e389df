use crate::core::{AppError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default time budget for one gateway call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Outbound HTTP settings shared by every adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Whole-request timeout
    pub timeout: Duration,

    /// TLS certificate verification; on unless explicitly disabled
    pub verify_tls: bool,

    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept any certificate. Sandbox use only.
    pub fn insecure_skip_tls_verify(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        Ok(TransportConfig {
            timeout: Duration::from_secs(
                env::var("PAYMENT_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid PAYMENT_HTTP_TIMEOUT_SECS".to_string())
                    })?,
            ),
            verify_tls: env::var("PAYMENT_VERIFY_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid PAYMENT_VERIFY_TLS".to_string()))?,
            user_agent: env::var("PAYMENT_USER_AGENT").ok(),
        })
    }

    /// Build the HTTP client these settings describe
    pub fn build_client(&self) -> Result<Client> {
        if self.timeout.is_zero() {
            return Err(AppError::configuration("transport timeout must be greater than 0"));
        }

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls);

        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        if !self.verify_tls {
            tracing::warn!("TLS certificate verification disabled for gateway transport");
        }

        builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))
    }
}
