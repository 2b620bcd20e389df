// Inbound notification verification is the inverse of outbound signing

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use paychannel::core::AppError;
use paychannel::gateways::services::signing::{value_text, Params};
use paychannel::gateways::{
    CbpayStrategy, GatewayFactory, PaymentStrategy, ToppayStrategy, WinpayStrategy,
};
use serde_json::json;
use std::collections::HashMap;

const UNUSED_HOST: &str = "http://127.0.0.1:9";

fn notification() -> Params {
    params(json!({
        "order_id": "ORD-77",
        "amount": "10050",
        "status": "SUCCESS",
        "sys_order_id": "SYS-1",
        "remark": "pix paid"
    }))
}

fn to_map(params: &Params) -> HashMap<String, String> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), value_text(v)))
        .collect()
}

fn assert_inverse(
    strategy: &dyn PaymentStrategy,
    other_key: &dyn PaymentStrategy,
    signed: HashMap<String, String>,
    sign_field: &str,
) {
    assert!(strategy.verify_callback(&signed));
    assert!(strategy.ensure_callback(&signed).is_ok());

    for field in signed.keys().filter(|k| k.as_str() != sign_field) {
        let mut mutated = signed.clone();
        mutated.get_mut(field).unwrap().push('x');
        assert!(!strategy.verify_callback(&mutated), "mutating {} verified", field);
    }

    let mut unsigned = signed.clone();
    unsigned.remove(sign_field);
    assert!(!strategy.verify_callback(&unsigned));
    assert!(matches!(
        strategy.ensure_callback(&unsigned),
        Err(AppError::SignatureMismatch(_))
    ));

    assert!(!other_key.verify_callback(&signed));
}

#[test]
fn test_cbpay_callback_inverse() {
    let strategy = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();
    let mut other = cbpay_config(UNUSED_HOST);
    other.merchant_private_key = "another-secret".to_string();
    let other = CbpayStrategy::new(&other).unwrap();

    let mut params = notification();
    let sign = strategy.sign(&params);
    params.insert("sign".to_string(), json!(sign));

    assert_inverse(&strategy, &other, to_map(&params), "sign");
}

#[test]
fn test_cbpay_signature_case_insensitive() {
    let strategy = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();
    let mut params = notification();
    let sign = strategy.sign(&params).to_lowercase();
    params.insert("sign".to_string(), json!(sign));

    assert!(strategy.verify_callback(&to_map(&params)));
}

#[test]
fn test_winpay_callback_inverse() {
    let strategy = WinpayStrategy::new(&winpay_config(UNUSED_HOST)).unwrap();
    let mut other = winpay_config(UNUSED_HOST);
    other.merchant_private_key = "another-secret".to_string();
    let other = WinpayStrategy::new(&other).unwrap();

    let mut params = notification();
    let sign = strategy.sign(&params);
    params.insert("sign".to_string(), json!(sign));

    assert_inverse(&strategy, &other, to_map(&params), "sign");
}

#[test]
fn test_toppay_callback_inverse() {
    let strategy = ToppayStrategy::new(&toppay_config(UNUSED_HOST)).unwrap();

    // Platform key pair swapped for the merchant's: its platSign no longer opens
    let other = ToppayStrategy::new(
        &toppay_config(UNUSED_HOST).with_platform_public_key(MERCHANT_KEYS.public_pem.clone()),
    )
    .unwrap();

    let mut params = notification();
    let plat_sign = platform_sign(&params);
    params.insert("platSign".to_string(), json!(plat_sign));

    assert_inverse(&strategy, &other, to_map(&params), "platSign");
}

#[test]
fn test_toppay_without_platform_key_never_verifies() {
    let mut config = toppay_config(UNUSED_HOST);
    config.platform_public_key = None;
    let strategy = GatewayFactory::create(&config).unwrap();

    let mut params = notification();
    let plat_sign = platform_sign(&params);
    params.insert("platSign".to_string(), json!(plat_sign));

    assert!(!strategy.verify_callback(&to_map(&params)));
}

#[test]
fn test_verification_through_factory() {
    let gateway = GatewayFactory::create(&cbpay_config(UNUSED_HOST)).unwrap();
    let signer = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();

    let mut params = notification();
    let sign = signer.sign(&params);
    params.insert("sign".to_string(), json!(sign));

    assert!(gateway.verify_callback(&to_map(&params)));
}
