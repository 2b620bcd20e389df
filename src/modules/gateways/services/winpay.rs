use super::gateway_trait::PaymentStrategy;
use super::signing::{
    digest_matches, from_callback, is_falsy, joined_pairs, md5_hex, value_text, Params, SIGN_FIELD,
};
use super::transport::{parse_object, HttpTransport};
use crate::core::{AppError, Result};
use crate::gateways::models::payment_response::text_field;
use crate::gateways::{
    ChannelCode, GatewayConfig, PayRequest, PayeeFallback, PaymentResponse, PayoutRequest,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_BASE_URL: &str = "https://api.winpay.site";
const SUCCESS_CODE: &str = "000000";
const COUNTRY_CODE: &str = "BR";
const CURRENCY_CODE: &str = "BRL";
const PAY_TYPE: &str = "0101";
const PAYOUT_TYPE: &str = "PIX";
const DEFAULT_PAYOUT_REMARK: &str = "default description";
const ANONYMOUS_PAYEE: &str = "anonymous";

/// WINPAY adapter: MD5 over the non-empty sorted query string, JSON bodies
pub struct WinpayStrategy {
    app_id: String,
    merchant_code: String,
    private_key: String,
    pay_url: String,
    payout_url: String,
    pay_notify_url: String,
    payout_notify_url: String,
    payee_fallback: Option<PayeeFallback>,
    transport: HttpTransport,
}

impl WinpayStrategy {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        if config.merchant_name.trim().is_empty() {
            return Err(AppError::configuration(
                "WINPAY requires the merchant name (appId)",
            ));
        }
        let base = config.api_base_or(DEFAULT_BASE_URL);

        Ok(Self {
            app_id: config.merchant_name.clone(),
            merchant_code: config.merchant_code.clone(),
            private_key: config.merchant_private_key.clone(),
            pay_url: format!("{}/br/payment.json", base),
            payout_url: format!("{}/br/payout.json", base),
            pay_notify_url: config.notify_url(ChannelCode::Winpay, "pay"),
            payout_notify_url: config.notify_url(ChannelCode::Winpay, "payout"),
            payee_fallback: config.payee_fallback.clone(),
            transport: HttpTransport::new(&config.transport, ChannelCode::Winpay)?,
        })
    }

    /// `MD5(k1=v1&...&key=<key>)` in lowercase hex over non-empty params
    pub fn sign(&self, params: &Params) -> String {
        let signed: Params = params
            .iter()
            .filter(|(k, v)| k.as_str() != SIGN_FIELD && !is_falsy(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        md5_hex(&format!("{}&key={}", joined_pairs(&signed), self.private_key))
    }

    pub fn check_sign(&self, params: &Params) -> bool {
        let provided = params.get(SIGN_FIELD).map(value_text).unwrap_or_default();
        digest_matches(&self.sign(params), &provided)
    }

    /// Signed pay parameters; `userName` carries the order number
    pub fn pay_params(&self, request: &PayRequest) -> Params {
        let mut params = Params::from([
            ("appId".to_string(), json!(self.app_id)),
            ("amount".to_string(), json!(request.amount)),
            ("countryCode".to_string(), json!(COUNTRY_CODE)),
            ("currencyCode".to_string(), json!(CURRENCY_CODE)),
            ("type".to_string(), json!(PAY_TYPE)),
            ("custId".to_string(), json!(self.merchant_code)),
            ("merchantOrderId".to_string(), json!(request.order_no)),
            ("userName".to_string(), json!(request.order_no)),
            ("backUrl".to_string(), json!(self.pay_notify_url)),
            ("remark".to_string(), json!(request.description)),
        ]);
        let sign = self.sign(&params);
        params.insert(SIGN_FIELD.to_string(), json!(sign));
        params
    }

    pub fn payout_params(&self, request: &PayoutRequest) -> Result<Params> {
        let (email, phone) = self.payee_contact(request)?;
        let user_name = if request.username.is_empty() {
            ANONYMOUS_PAYEE
        } else {
            request.username.as_str()
        };

        let mut params = Params::from([
            ("amount".to_string(), json!(request.amount)),
            ("appId".to_string(), json!(self.app_id)),
            ("backUrl".to_string(), json!(self.payout_notify_url)),
            ("countryCode".to_string(), json!(COUNTRY_CODE)),
            ("currencyCode".to_string(), json!(CURRENCY_CODE)),
            ("custId".to_string(), json!(self.merchant_code)),
            ("email".to_string(), json!(email)),
            ("merchantOrderId".to_string(), json!(request.order_no)),
            ("cpf".to_string(), json!(request.cpf)),
            ("phone".to_string(), json!(phone)),
            (
                "remark".to_string(),
                json!(request.description.as_deref().unwrap_or(DEFAULT_PAYOUT_REMARK)),
            ),
            ("type".to_string(), json!(PAYOUT_TYPE)),
            ("userName".to_string(), json!(user_name)),
        ]);
        if let Some(ref card_type) = request.card_type {
            params.insert("cardType".to_string(), json!(card_type));
        }
        if let Some(ref wallet_id) = request.wallet_id {
            params.insert("walletId".to_string(), json!(wallet_id));
        }

        let sign = self.sign(&params);
        params.insert(SIGN_FIELD.to_string(), json!(sign));
        Ok(params)
    }

    /// Email and phone sent for the payee
    fn payee_contact(&self, request: &PayoutRequest) -> Result<(String, String)> {
        if !request.pix_account.is_empty() {
            return Ok((request.pix_account.clone(), request.pix_account.clone()));
        }

        match self.payee_fallback {
            Some(ref fallback) => {
                tracing::info!(
                    order_no = %request.order_no,
                    "WINPAY payout without payee contact, using configured fallback"
                );
                Ok((fallback.email.clone(), fallback.phone.clone()))
            }
            None => Err(AppError::validation(
                "payee contact is empty and no fallback contact is configured",
            )),
        }
    }

    fn adapt_response(raw: String, url_field: Option<&str>) -> Result<PaymentResponse> {
        let body = parse_object(&raw)?;
        let code = text_field(&body, "code");
        let message = match text_field(&body, "msg") {
            msg if msg.is_empty() => code.clone(),
            msg => msg,
        };

        let response = if code == SUCCESS_CODE {
            PaymentResponse::accepted(raw)
        } else {
            PaymentResponse::rejected(code, raw)
        };
        let pay_url = url_field.map(|f| text_field(&body, f)).unwrap_or_default();

        Ok(response
            .with_message(message)
            .with_plat_order_num(text_field(&body, "order"))
            .with_pay_url(pay_url))
    }
}

#[async_trait]
impl PaymentStrategy for WinpayStrategy {
    async fn pay(&self, request: &PayRequest) -> Result<PaymentResponse> {
        let params = self.pay_params(request);
        let raw = self
            .transport
            .post_json(&self.pay_url, &Value::Object(params.into_iter().collect()))
            .await?;
        Self::adapt_response(raw, Some("payContent"))
    }

    async fn payout(&self, request: &PayoutRequest) -> Result<PaymentResponse> {
        let params = self.payout_params(request)?;
        let raw = self
            .transport
            .post_json(&self.payout_url, &Value::Object(params.into_iter().collect()))
            .await?;
        Self::adapt_response(raw, None)
    }

    fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        self.check_sign(&from_callback(params))
    }

    fn channel(&self) -> ChannelCode {
        ChannelCode::Winpay
    }
}
