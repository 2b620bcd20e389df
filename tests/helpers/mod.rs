// Shared fixtures for gateway tests
//
// Key pairs are generated once per test binary. Mocked gateways are served by
// wiremock and wired in through `GatewayConfig::with_api_base_url`.

#![allow(dead_code)]

use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use paychannel::config::TransportConfig;
use paychannel::gateways::services::rsa_cipher::{load_private_key, private_encrypt};
use paychannel::gateways::services::signing::{concatenated_values, Params};
use paychannel::gateways::{GatewayConfig, PayeeFallback};
use base64::prelude::*;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

pub const CALLBACK_BASE_URL: &str = "https://shop.example.com";
pub const CBPAY_KEY: &str = "cb-merchant-secret";
pub const WINPAY_KEY: &str = "wp-merchant-secret";

/// PEM-encoded RSA key pair
pub struct KeyPair {
    pub private_pem: String,
    pub public_pem: String,
}

impl KeyPair {
    pub fn generate() -> Self {
        let rsa = Rsa::generate(1024).expect("generate RSA key");
        let public_pem = String::from_utf8(rsa.public_key_to_pem().expect("public PEM"))
            .expect("utf8 PEM");
        let private_pem = String::from_utf8(
            PKey::from_rsa(rsa)
                .expect("wrap key")
                .private_key_to_pem_pkcs8()
                .expect("private PEM"),
        )
        .expect("utf8 PEM");

        Self {
            private_pem,
            public_pem,
        }
    }
}

pub static MERCHANT_KEYS: LazyLock<KeyPair> = LazyLock::new(KeyPair::generate);
pub static PLATFORM_KEYS: LazyLock<KeyPair> = LazyLock::new(KeyPair::generate);

fn test_transport() -> TransportConfig {
    TransportConfig::default().with_timeout(Duration::from_secs(5))
}

pub fn cbpay_config(api_base_url: &str) -> GatewayConfig {
    GatewayConfig::new("CB1001", "shop", CBPAY_KEY, "CBPAY", CALLBACK_BASE_URL)
        .with_api_base_url(api_base_url)
        .with_transport(test_transport())
}

pub fn toppay_config(api_base_url: &str) -> GatewayConfig {
    GatewayConfig::new(
        "TP2002",
        "shop",
        MERCHANT_KEYS.private_pem.clone(),
        "TOPPAY",
        CALLBACK_BASE_URL,
    )
    .with_platform_public_key(PLATFORM_KEYS.public_pem.clone())
    .with_api_base_url(api_base_url)
    .with_transport(test_transport())
}

pub fn winpay_config(api_base_url: &str) -> GatewayConfig {
    GatewayConfig::new("WP3003", "app-3003", WINPAY_KEY, "WINPAY", CALLBACK_BASE_URL)
        .with_api_base_url(api_base_url)
        .with_transport(test_transport())
        .with_payee_fallback(PayeeFallback {
            email: "payouts@shop.example.com".to_string(),
            phone: "+5511900000000".to_string(),
        })
}

/// `platSign` the TOPPAY platform would attach to `params`
pub fn platform_sign(params: &Params) -> String {
    let key = load_private_key(&PLATFORM_KEYS.private_pem).expect("platform key");
    let crypto = private_encrypt(&key, concatenated_values(params).as_bytes()).expect("encrypt");
    BASE64_STANDARD.encode(crypto)
}

/// Builds a parameter set from JSON object literal
pub fn params(value: Value) -> Params {
    value
        .as_object()
        .expect("object literal")
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
