use crate::core::{AppError, Result};
use crate::gateways::{ChannelCode, GatewayConfig, PayeeFallback};
use serde::Deserialize;
use std::env;

pub mod transport;

pub use transport::TransportConfig;

/// Application configuration for driving gateway channels
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub callback_base_url: String,
    pub transport: TransportConfig,
    pub payee_fallback: Option<PayeeFallback>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    pub fn log_directive(&self) -> String {
        format!("paychannel={}", self.log_level)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            callback_base_url: env::var("PAYMENT_CALLBACK_BASE_URL").map_err(|_| {
                AppError::Configuration("PAYMENT_CALLBACK_BASE_URL not set".to_string())
            })?,
            transport: TransportConfig::from_env()?,
            payee_fallback: match (
                env::var("PAYMENT_FALLBACK_EMAIL"),
                env::var("PAYMENT_FALLBACK_PHONE"),
            ) {
                (Ok(email), Ok(phone)) => Some(PayeeFallback { email, phone }),
                _ => None,
            },
        };

        Ok(config)
    }

    /// Merchant credentials for one channel, read from `{CHANNEL}_*` variables
    pub fn gateway(&self, channel_code: &str) -> Result<GatewayConfig> {
        self.gateway_with(channel_code, |key| env::var(key).ok())
    }

    /// Same as [`Config::gateway`] with a caller-supplied variable lookup
    pub fn gateway_with<F>(&self, channel_code: &str, lookup: F) -> Result<GatewayConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel: ChannelCode = channel_code.parse()?;
        let prefix = channel.as_str();
        let required = |name: &str| {
            let key = format!("{}_{}", prefix, name);
            lookup(&key).ok_or_else(|| AppError::Configuration(format!("{} not set", key)))
        };
        let optional = |name: &str| lookup(&format!("{}_{}", prefix, name));

        let mut config = GatewayConfig::new(
            required("MERCHANT_CODE")?,
            optional("MERCHANT_NAME").unwrap_or_default(),
            required("MERCHANT_PRIVATE_KEY")?,
            channel.as_str(),
            self.callback_base_url.clone(),
        )
        .with_transport(self.transport.clone());

        if let Some(key) = optional("PLATFORM_PUBLIC_KEY") {
            config = config.with_platform_public_key(key);
        }
        if let Some(url) = optional("API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        if let Some(ref fallback) = self.payee_fallback {
            config = config.with_payee_fallback(fallback.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transport.timeout.is_zero() {
            return Err(AppError::Configuration(
                "PAYMENT_HTTP_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.callback_base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid PAYMENT_CALLBACK_BASE_URL: {}", e))
        })?;

        Ok(())
    }
}
