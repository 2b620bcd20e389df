use super::signing::{form_encoded, Params};
use crate::config::TransportConfig;
use crate::core::{AppError, Result};
use crate::gateways::ChannelCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// POST executor owned by one adapter
///
/// Sends one request per call, with no retry. Timeout and TLS verification
/// come from [`TransportConfig`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    channel: ChannelCode,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig, channel: ChannelCode) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            channel,
        })
    }

    /// POST `body` as JSON and return the raw response text
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<String> {
        let payload = serde_json::to_string(body)?;
        self.post(url, JSON_CONTENT_TYPE, payload).await
    }

    /// POST `params` form-encoded and return the raw response text
    pub async fn post_form(&self, url: &str, params: &Params) -> Result<String> {
        self.post(url, FORM_CONTENT_TYPE, form_encoded(params)).await
    }

    async fn post(&self, url: &str, content_type: &str, payload: String) -> Result<String> {
        let content_length = payload.len();
        info!(
            channel = %self.channel,
            url = %url,
            content_length,
            body = %payload,
            "Sending gateway request"
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    channel = %self.channel,
                    url = %url,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    error = %e,
                    "Gateway request failed"
                );
                AppError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        info!(
            channel = %self.channel,
            status = status.as_u16(),
            response = %body,
            "Gateway response received"
        );

        if !status.is_success() {
            return Err(AppError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Decodes a gateway body that must be a JSON object
pub fn parse_object(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            debug!(kind = ?other, "Gateway body is JSON but not an object");
            Err(AppError::malformed("expected a JSON object", raw))
        }
        Err(e) => Err(AppError::malformed(format!("invalid JSON: {}", e), raw)),
    }
}
