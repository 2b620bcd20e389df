use super::gateway_trait::PaymentStrategy;
use super::signing::{
    digest_matches, form_encoded, from_callback, from_json_object, joined_pairs, md5_hex_upper,
    value_text, without, Params, SIGN_FIELD,
};
use super::transport::{parse_object, HttpTransport};
use crate::core::Result;
use crate::gateways::models::payment_response::{text_field, truthy_field};
use crate::gateways::{ChannelCode, GatewayConfig, PayRequest, PaymentResponse, PayoutRequest};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://pay3.cbpay888.com";
const ORDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PAY_TYPE_PIX: &str = "1001";
const PAYOUT_CURRENCY: &str = "BRL";
const PAYER_EMAIL_DOMAIN: &str = "faker.com";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("Valid email pattern")
});

/// True when `value` is a syntactically valid email address
pub fn is_email(value: &str) -> bool {
    const EMAIL_MAX_LENGTH: usize = 319;
    if value.is_empty() || value.chars().count() > EMAIL_MAX_LENGTH {
        return false;
    }
    EMAIL_REGEX.is_match(value)
}

/// Where a CBPAY payout lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixDestination {
    TaxId { cpf: String, account_name: String },
    Email { email: String, account_name: String },
    Phone { phone: String, account_name: String },
}

impl PixDestination {
    /// Taxpayer id wins; otherwise the PIX key is an email if it parses as one, else a phone
    pub fn infer(request: &PayoutRequest) -> Self {
        let account_name = request.username.clone();
        if request.has_taxpayer_id() {
            PixDestination::TaxId {
                cpf: request.cpf.clone(),
                account_name,
            }
        } else if is_email(&request.pix_account) {
            PixDestination::Email {
                email: request.pix_account.clone(),
                account_name,
            }
        } else {
            PixDestination::Phone {
                phone: request.pix_account.clone(),
                account_name,
            }
        }
    }

    pub fn account_type(&self) -> &'static str {
        match self {
            PixDestination::TaxId { .. } => "PIX_CPF",
            PixDestination::Email { .. } => "PIX_EMAIL",
            PixDestination::Phone { .. } => "PIX_PHONE",
        }
    }

    /// Nested `data` record as the gateway expects it
    pub fn to_params(&self) -> Params {
        let (key, value, account_name) = match self {
            PixDestination::TaxId { cpf, account_name } => ("cpf", cpf, account_name),
            PixDestination::Email {
                email,
                account_name,
            } => ("email", email, account_name),
            PixDestination::Phone {
                phone,
                account_name,
            } => ("phone", phone, account_name),
        };

        Params::from([
            ("accountType".to_string(), json!(self.account_type())),
            (key.to_string(), json!(value)),
            ("accountName".to_string(), json!(account_name)),
        ])
    }
}

/// CBPAY adapter: shared-secret MD5 signing, form-encoded pay, JSON payout
pub struct CbpayStrategy {
    merchant_code: String,
    private_key: String,
    pay_url: String,
    payout_url: String,
    pay_notify_url: String,
    payout_notify_url: String,
    transport: HttpTransport,
}

impl CbpayStrategy {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        let base = config.api_base_or(DEFAULT_BASE_URL);

        Ok(Self {
            merchant_code: config.merchant_code.clone(),
            private_key: config.merchant_private_key.clone(),
            pay_url: format!("{}/", base),
            payout_url: format!("{}/payout", base),
            pay_notify_url: config.notify_url(ChannelCode::Cbpay, "pay"),
            payout_notify_url: config.notify_url(ChannelCode::Cbpay, "payout"),
            transport: HttpTransport::new(&config.transport, ChannelCode::Cbpay)?,
        })
    }

    /// `MD5(k1=v1&k2=v2...<key>)` in uppercase hex, `sign` excluded
    pub fn sign(&self, params: &Params) -> String {
        let canonical = joined_pairs(&without(params, SIGN_FIELD));
        md5_hex_upper(&format!("{}{}", canonical, self.private_key))
    }

    /// Recomputes the signature of `params` and compares it with its `sign` field
    pub fn check_sign(&self, params: &Params) -> bool {
        let provided = params.get(SIGN_FIELD).map(value_text).unwrap_or_default();
        digest_matches(&self.sign(params), &provided)
    }

    /// Two-part payout signature over the top-level and destination records
    pub fn payout_signature(&self, params: &Params, destination: &Params) -> String {
        let sign_input = format!(
            "{}&{}{}",
            joined_pairs(&without(params, SIGN_FIELD)),
            form_encoded(destination),
            self.private_key
        );
        md5_hex_upper(&sign_input)
    }

    /// Signed pay parameters for `request` stamped with `order_time`
    pub fn pay_params(&self, request: &PayRequest, order_time: &str) -> Params {
        let mut params = Params::from([
            ("version".to_string(), json!("1.0.0")),
            ("mer_id".to_string(), json!(self.merchant_code)),
            ("order_id".to_string(), json!(request.order_no)),
            ("amount".to_string(), json!(request.amount)),
            ("order_time".to_string(), json!(order_time)),
            ("notifyurl".to_string(), json!(self.pay_notify_url)),
            ("paytype".to_string(), json!(PAY_TYPE_PIX)),
            ("name".to_string(), json!(request.username)),
            (
                "email".to_string(),
                json!(format!("{}@{}", request.username, PAYER_EMAIL_DOMAIN)),
            ),
            ("body".to_string(), json!(request.description)),
            ("method".to_string(), json!("md5")),
        ]);
        let sign = self.sign(&params);
        params.insert(SIGN_FIELD.to_string(), json!(sign));
        params
    }

    /// Signed payout body for `request` stamped with `order_time`
    pub fn payout_body(&self, request: &PayoutRequest, order_time: &str) -> Result<Params> {
        let mut params = Params::from([
            ("mer_id".to_string(), json!(self.merchant_code)),
            ("order_id".to_string(), json!(request.order_no)),
            ("amount".to_string(), json!(request.amount)),
            ("order_time".to_string(), json!(order_time)),
            ("currency".to_string(), json!(PAYOUT_CURRENCY)),
            ("notifyurl".to_string(), json!(self.payout_notify_url)),
        ]);

        let destination = PixDestination::infer(request).to_params();
        let sign = self.payout_signature(&params, &destination);
        params.insert(SIGN_FIELD.to_string(), json!(sign));
        params.insert("data".to_string(), json!(serde_json::to_string(&destination)?));
        Ok(params)
    }

    fn adapt_pay_response(&self, raw: String) -> Result<PaymentResponse> {
        let body = parse_object(&raw)?;
        let message = text_field(&body, "msg");

        if !truthy_field(&body, "status") {
            return Ok(PaymentResponse::rejected("", raw).with_message(message));
        }

        if !self.check_sign(&from_json_object(&body)) {
            warn!(channel = %ChannelCode::Cbpay, "Pay response signature mismatch");
            return Ok(PaymentResponse::rejected("", raw).with_message(message));
        }

        let url = text_field(&body, "url");
        Ok(PaymentResponse::accepted(raw)
            .with_message(message)
            .with_pay_url(url))
    }

    fn adapt_payout_response(&self, raw: String) -> Result<PaymentResponse> {
        let body = parse_object(&raw)?;
        let response = if truthy_field(&body, "success") {
            PaymentResponse::accepted(raw)
        } else {
            PaymentResponse::rejected("", raw)
        };

        Ok(response
            .with_message(text_field(&body, "msg"))
            .with_plat_order_num(text_field(&body, "sys_order_id")))
    }
}

fn order_time_now() -> String {
    chrono::Local::now().format(ORDER_TIME_FORMAT).to_string()
}

#[async_trait]
impl PaymentStrategy for CbpayStrategy {
    async fn pay(&self, request: &PayRequest) -> Result<PaymentResponse> {
        let params = self.pay_params(request, &order_time_now());
        let raw = self.transport.post_form(&self.pay_url, &params).await?;
        self.adapt_pay_response(raw)
    }

    async fn payout(&self, request: &PayoutRequest) -> Result<PaymentResponse> {
        let body = self.payout_body(request, &order_time_now())?;
        let raw = self
            .transport
            .post_json(&self.payout_url, &Value::Object(body.into_iter().collect()))
            .await?;
        self.adapt_payout_response(raw)
    }

    fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        self.check_sign(&from_callback(params))
    }

    fn channel(&self) -> ChannelCode {
        ChannelCode::Cbpay
    }
}
