use super::gateway_trait::PaymentStrategy;
use super::rsa_cipher::{load_private_key, load_public_key, private_encrypt, public_decrypt};
use super::signing::{concatenated_values, from_callback, without, Params, SIGN_FIELD};
use super::transport::{parse_object, HttpTransport};
use crate::core::amount::{minor_to_major, to_json_number};
use crate::core::{AppError, Result};
use crate::gateways::models::payment_response::text_field;
use crate::gateways::{ChannelCode, GatewayConfig, PayRequest, PaymentResponse, PayoutRequest};
use async_trait::async_trait;
use base64::prelude::*;
use openssl::pkey::{Private, Public};
use openssl::rsa::Rsa;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://bra-openapi.toppay.asia";
const SUCCESS_CODE: &str = "SUCCESS";
const DEFAULT_BALANCE_CURRENCY: &str = "BRL";

/// Field carrying the gateway's own RSA cryptogram
pub const PLAT_SIGN_FIELD: &str = "platSign";

/// Which ledger an order query looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// Collection orders
    Order,
    /// Disbursements
    Cash,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Order => "ORDER_QUERY",
            QueryType::Cash => "CASH_QUERY",
        }
    }
}

/// Decoded TOPPAY answer with the platform signature opened
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub body: Map<String, Value>,
    pub raw: String,
    pub decrypted_sign: Option<String>,
}

/// TOPPAY adapter: RSA private-key signing, public-key verification, amounts in reais
pub struct ToppayStrategy {
    merchant_code: String,
    private_key: Rsa<Private>,
    platform_key: Option<Rsa<Public>>,
    pay_url: String,
    payout_url: String,
    query_url: String,
    balance_url: String,
    pay_notify_url: String,
    payout_notify_url: String,
    transport: HttpTransport,
}

impl ToppayStrategy {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        let base = config.api_base_or(DEFAULT_BASE_URL);
        let platform_key = match config.platform_public_key.as_deref() {
            Some(material) if !material.trim().is_empty() => Some(load_public_key(material)?),
            _ => {
                warn!("TOPPAY configured without a platform public key; responses will not be decrypted");
                None
            }
        };

        Ok(Self {
            merchant_code: config.merchant_code.clone(),
            private_key: load_private_key(&config.merchant_private_key)?,
            platform_key,
            pay_url: format!("{}/gateway/prepaidOrder", base),
            payout_url: format!("{}/gateway/cash", base),
            query_url: format!("{}/gateway/query", base),
            balance_url: format!("{}/gateway/interface/getBalance", base),
            pay_notify_url: config.notify_url(ChannelCode::Toppay, "pay"),
            payout_notify_url: config.notify_url(ChannelCode::Toppay, "payout"),
            transport: HttpTransport::new(&config.transport, ChannelCode::Toppay)?,
        })
    }

    /// Base64 of the chunked private-key encryption of the sorted values
    pub fn sign(&self, params: &Params) -> Result<String> {
        let plaintext = concatenated_values(&without(params, SIGN_FIELD));
        let crypto = private_encrypt(&self.private_key, plaintext.as_bytes())?;
        Ok(BASE64_STANDARD.encode(crypto))
    }

    /// Opens a `platSign` value with the platform public key
    pub fn decrypt_plat_sign(&self, plat_sign: &str) -> Result<String> {
        let key = self.platform_key.as_ref().ok_or_else(|| {
            AppError::configuration("TOPPAY platform public key is not configured")
        })?;
        let crypto = BASE64_STANDARD
            .decode(plat_sign.trim())
            .map_err(|e| AppError::signature_mismatch(format!("platSign is not base64: {}", e)))?;
        let plaintext = public_decrypt(key, &crypto)?;
        Ok(String::from_utf8_lossy(&plaintext).into_owned())
    }

    pub fn pay_params(&self, request: &PayRequest) -> Result<Params> {
        let mut params = Params::from([
            ("merchantCode".to_string(), json!(self.merchant_code)),
            ("orderType".to_string(), json!("0")),
            ("method".to_string(), json!("PIX")),
            ("orderNum".to_string(), json!(request.order_no)),
            ("payMoney".to_string(), to_json_number(minor_to_major(&request.amount)?)?),
            ("name".to_string(), json!(request.username)),
            ("notifyUrl".to_string(), json!(self.pay_notify_url)),
            ("description".to_string(), json!(request.description)),
        ]);
        self.attach_sign(&mut params)?;
        Ok(params)
    }

    pub fn payout_params(&self, request: &PayoutRequest) -> Result<Params> {
        let mut params = Params::from([
            ("merchantCode".to_string(), json!(self.merchant_code)),
            ("orderType".to_string(), json!("0")),
            ("method".to_string(), json!("DISBURSEMENT")),
            ("orderNum".to_string(), json!(request.order_no)),
            ("money".to_string(), to_json_number(minor_to_major(&request.amount)?)?),
            ("feeType".to_string(), json!("0")),
            ("name".to_string(), json!(request.username)),
            ("pixType".to_string(), json!("CPF")),
            ("pixAccount".to_string(), json!(request.pix_account)),
            ("taxNumber".to_string(), json!(request.cpf)),
            ("notifyUrl".to_string(), json!(self.payout_notify_url)),
        ]);
        if let Some(ref description) = request.description {
            params.insert("description".to_string(), json!(description));
        }
        self.attach_sign(&mut params)?;
        Ok(params)
    }

    /// Status of a collection (`Order`) or disbursement (`Cash`)
    pub async fn order_query(
        &self,
        order_no: &str,
        plat_order_no: &str,
        query_type: QueryType,
    ) -> Result<ProviderReply> {
        let mut params = Params::from([
            ("merchantCode".to_string(), json!(self.merchant_code)),
            ("platOrderNum".to_string(), json!(plat_order_no)),
            ("orderNum".to_string(), json!(order_no)),
            ("queryType".to_string(), json!(query_type.as_str())),
        ]);
        self.attach_sign(&mut params)?;
        self.call(&self.query_url, &params).await
    }

    /// Merchant balance in `currency`, BRL when `None`
    pub async fn balance_query(&self, currency: Option<&str>) -> Result<ProviderReply> {
        let mut params = Params::from([
            ("merchantCode".to_string(), json!(self.merchant_code)),
            (
                "currency".to_string(),
                json!(currency.unwrap_or(DEFAULT_BALANCE_CURRENCY)),
            ),
        ]);
        self.attach_sign(&mut params)?;
        self.call(&self.balance_url, &params).await
    }

    fn attach_sign(&self, params: &mut Params) -> Result<()> {
        let sign = self.sign(params)?;
        params.insert(SIGN_FIELD.to_string(), json!(sign));
        Ok(())
    }

    async fn call(&self, url: &str, params: &Params) -> Result<ProviderReply> {
        let body = Value::Object(params.clone().into_iter().collect());
        let raw = self.transport.post_json(url, &body).await?;
        self.open_reply(raw)
    }

    fn open_reply(&self, raw: String) -> Result<ProviderReply> {
        let body = parse_object(&raw)?;
        let decrypted_sign = match body.get(PLAT_SIGN_FIELD).and_then(Value::as_str) {
            Some(plat_sign) if self.platform_key.is_some() => {
                match self.decrypt_plat_sign(plat_sign) {
                    Ok(plaintext) => {
                        debug!(decrypted = %plaintext, "TOPPAY platSign opened");
                        Some(plaintext)
                    }
                    Err(e) => {
                        warn!(error = %e, "TOPPAY platSign could not be opened");
                        None
                    }
                }
            }
            Some(_) => {
                warn!("TOPPAY response carries platSign but no platform key is configured");
                None
            }
            None => None,
        };

        Ok(ProviderReply {
            body,
            raw,
            decrypted_sign,
        })
    }

    fn adapt_response(reply: ProviderReply) -> PaymentResponse {
        let code = text_field(&reply.body, "platRespCode");
        let mut response = if code == SUCCESS_CODE {
            PaymentResponse::accepted(reply.raw)
        } else {
            PaymentResponse::rejected(code, reply.raw)
        };
        response.decrypted_sign = reply.decrypted_sign;

        response
            .with_message(text_field(&reply.body, "platRespMessage"))
            .with_plat_order_num(text_field(&reply.body, "platOrderNum"))
            .with_pay_url(text_field(&reply.body, "url"))
    }
}

#[async_trait]
impl PaymentStrategy for ToppayStrategy {
    async fn pay(&self, request: &PayRequest) -> Result<PaymentResponse> {
        let params = self.pay_params(request)?;
        let reply = self.call(&self.pay_url, &params).await?;
        Ok(Self::adapt_response(reply))
    }

    async fn payout(&self, request: &PayoutRequest) -> Result<PaymentResponse> {
        let params = self.payout_params(request)?;
        let reply = self.call(&self.payout_url, &params).await?;
        Ok(Self::adapt_response(reply))
    }

    fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        let Some(plat_sign) = params.get(PLAT_SIGN_FIELD) else {
            return false;
        };

        match self.decrypt_plat_sign(plat_sign) {
            Ok(plaintext) => {
                plaintext == concatenated_values(&without(&from_callback(params), PLAT_SIGN_FIELD))
            }
            Err(e) => {
                warn!(error = %e, "TOPPAY notification could not be verified");
                false
            }
        }
    }

    fn channel(&self) -> ChannelCode {
        ChannelCode::Toppay
    }
}
