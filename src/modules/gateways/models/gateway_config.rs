use crate::config::TransportConfig;
use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known gateway channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelCode {
    Cbpay,
    Toppay,
    Winpay,
}

impl ChannelCode {
    pub const ALL: [ChannelCode; 3] = [ChannelCode::Cbpay, ChannelCode::Toppay, ChannelCode::Winpay];

    /// Code as used in configuration (`CBPAY`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelCode::Cbpay => "CBPAY",
            ChannelCode::Toppay => "TOPPAY",
            ChannelCode::Winpay => "WINPAY",
        }
    }

    /// Path segment used in notification URLs (`cbpay`)
    pub fn slug(&self) -> &'static str {
        match self {
            ChannelCode::Cbpay => "cbpay",
            ChannelCode::Toppay => "toppay",
            ChannelCode::Winpay => "winpay",
        }
    }
}

impl fmt::Display for ChannelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "CBPAY" => Ok(ChannelCode::Cbpay),
            "TOPPAY" => Ok(ChannelCode::Toppay),
            "WINPAY" => Ok(ChannelCode::Winpay),
            _ => Err(AppError::UnsupportedChannel(s.to_string())),
        }
    }
}

/// Contact used when a payout arrives without a payee email or phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeFallback {
    pub email: String,
    pub phone: String,
}

/// Merchant credentials and wiring for one gateway channel
///
/// Built once per transaction context and not mutated afterwards; adapters
/// copy what they need at construction.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub merchant_name: String,
    pub merchant_code: String,
    #[serde(skip_serializing)]
    pub merchant_private_key: String,
    pub channel_code: String,
    pub platform_public_key: Option<String>,

    /// Root the gateway posts notifications back to, e.g. `https://shop.example.com`
    pub callback_base_url: String,

    /// Overrides the gateway host (sandbox or local test server)
    pub api_base_url: Option<String>,

    #[serde(default)]
    pub transport: TransportConfig,

    pub payee_fallback: Option<PayeeFallback>,
}

impl GatewayConfig {
    pub fn new(
        merchant_code: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_private_key: impl Into<String>,
        channel_code: impl Into<String>,
        callback_base_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_name: merchant_name.into(),
            merchant_code: merchant_code.into(),
            merchant_private_key: merchant_private_key.into(),
            channel_code: channel_code.into(),
            platform_public_key: None,
            callback_base_url: callback_base_url.into(),
            api_base_url: None,
            transport: TransportConfig::default(),
            payee_fallback: None,
        }
    }

    pub fn with_platform_public_key(mut self, key: impl Into<String>) -> Self {
        self.platform_public_key = Some(key.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_payee_fallback(mut self, fallback: PayeeFallback) -> Self {
        self.payee_fallback = Some(fallback);
        self
    }

    /// Parsed channel; unknown codes yield `UnsupportedChannel`
    pub fn channel(&self) -> Result<ChannelCode> {
        self.channel_code.parse()
    }

    /// API host for this channel, trailing slash removed
    pub fn api_base_or(&self, default: &str) -> String {
        self.api_base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Notification URL for the given flow (`pay` or `payout`)
    pub fn notify_url(&self, channel: ChannelCode, flow: &str) -> String {
        format!(
            "{}/api/callback/{}/{}",
            self.callback_base_url.trim_end_matches('/'),
            channel.slug(),
            flow
        )
    }

    /// Checks fields every adapter relies on
    pub fn validate(&self) -> Result<()> {
        if self.merchant_code.trim().is_empty() {
            return Err(AppError::configuration("merchant code must not be empty"));
        }
        if self.merchant_private_key.trim().is_empty() {
            return Err(AppError::configuration(
                "merchant private key must not be empty",
            ));
        }
        let callback = url::Url::parse(&self.callback_base_url).map_err(|e| {
            AppError::configuration(format!(
                "invalid callback base URL '{}': {}",
                self.callback_base_url, e
            ))
        })?;
        if !matches!(callback.scheme(), "http" | "https") {
            return Err(AppError::configuration(
                "callback base URL must use http or https",
            ));
        }
        Ok(())
    }
}

// Keys stay out of logs
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_name", &self.merchant_name)
            .field("merchant_code", &self.merchant_code)
            .field("merchant_private_key", &"***")
            .field("channel_code", &self.channel_code)
            .field("platform_public_key", &self.platform_public_key.as_ref().map(|_| "***"))
            .field("callback_base_url", &self.callback_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("transport", &self.transport)
            .field("payee_fallback", &self.payee_fallback)
            .finish()
    }
}
