use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flag carried by every accepted transaction
pub const SUCCESS_FLAG: &str = "SUCCESS";

/// Canonical result every adapter produces
///
/// Callers read only these fields; provider-specific detail stays in
/// `origin_json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub is_success: bool,

    /// `SUCCESS`, or the provider's own status code
    pub success_flag: String,

    pub resp_message: String,

    /// Provider order reference, empty when not returned
    pub plat_order_num: String,

    /// Redirect or payment URL, empty when not applicable
    pub pay_url: String,

    /// Provider body exactly as received
    pub origin_json: String,

    /// Plaintext recovered from a provider platform signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrypted_sign: Option<String>,
}

impl PaymentResponse {
    pub fn accepted(origin_json: impl Into<String>) -> Self {
        Self {
            is_success: true,
            success_flag: SUCCESS_FLAG.to_string(),
            origin_json: origin_json.into(),
            ..Default::default()
        }
    }

    pub fn rejected(success_flag: impl Into<String>, origin_json: impl Into<String>) -> Self {
        Self {
            is_success: false,
            success_flag: success_flag.into(),
            origin_json: origin_json.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.resp_message = message.into();
        self
    }

    pub fn with_plat_order_num(mut self, order_num: impl Into<String>) -> Self {
        self.plat_order_num = order_num.into();
        self
    }

    pub fn with_pay_url(mut self, url: impl Into<String>) -> Self {
        self.pay_url = url.into();
        self
    }
}

/// Reads a field as text, treating absent or null as empty
pub(crate) fn text_field(body: &serde_json::Map<String, Value>, key: &str) -> String {
    match body.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Loose truthiness of a status field (`true`, `1`, `"1"`, `"true"`)
pub(crate) fn truthy_field(body: &serde_json::Map<String, Value>, key: &str) -> bool {
    match body.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}
