// Property tests for parameter canonicalization and RSA chunking

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use paychannel::gateways::services::rsa_cipher::{
    load_private_key, load_public_key, private_encrypt, public_decrypt,
};
use paychannel::gateways::services::signing::Params;
use paychannel::gateways::{CbpayStrategy, ToppayStrategy, WinpayStrategy};
use proptest::prelude::*;
use serde_json::json;

const UNUSED_HOST: &str = "http://127.0.0.1:9";

fn build(pairs: &[(String, String)]) -> Params {
    let mut params = Params::new();
    for (k, v) in pairs {
        params.insert(k.clone(), json!(v));
    }
    params
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("k[a-zA-Z]{0,11}", "[ -~]{0,24}", 1..12)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn symmetric_signatures_ignore_insertion_order(pairs in pairs_strategy()) {
        let cbpay = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();
        let winpay = WinpayStrategy::new(&winpay_config(UNUSED_HOST)).unwrap();

        let forward = build(&pairs);
        let mut reversed_pairs = pairs.clone();
        reversed_pairs.reverse();
        let reversed = build(&reversed_pairs);

        prop_assert_eq!(cbpay.sign(&forward), cbpay.sign(&reversed));
        prop_assert_eq!(winpay.sign(&forward), winpay.sign(&reversed));
    }

    #[test]
    fn symmetric_signatures_change_with_any_value(pairs in pairs_strategy(), idx in any::<prop::sample::Index>()) {
        let cbpay = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();
        let original = build(&pairs);

        let mut mutated_pairs = pairs.clone();
        let i = idx.index(mutated_pairs.len());
        mutated_pairs[i].1.push('#');
        let mutated = build(&mutated_pairs);

        prop_assert_ne!(cbpay.sign(&original), cbpay.sign(&mutated));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn rsa_chunks_round_trip(plaintext in "[ -~]{0,400}") {
        let private = load_private_key(&MERCHANT_KEYS.private_pem).unwrap();
        let public = load_public_key(&MERCHANT_KEYS.public_pem).unwrap();

        let crypto = private_encrypt(&private, plaintext.as_bytes()).unwrap();
        prop_assert_eq!(crypto.len() % 128, 0);

        let recovered = public_decrypt(&public, &crypto).unwrap();
        prop_assert_eq!(String::from_utf8(recovered).unwrap(), plaintext);
    }

    #[test]
    fn toppay_signature_is_deterministic(pairs in pairs_strategy()) {
        let toppay = ToppayStrategy::new(&toppay_config(UNUSED_HOST)).unwrap();
        let forward = build(&pairs);
        let mut reversed_pairs = pairs.clone();
        reversed_pairs.reverse();

        prop_assert_eq!(toppay.sign(&forward).unwrap(), toppay.sign(&build(&reversed_pairs)).unwrap());
    }
}

#[test]
fn test_cbpay_known_signature() {
    let cbpay = CbpayStrategy::new(&cbpay_config(UNUSED_HOST)).unwrap();
    let p = params(json!({"order_id": "A1", "amount": "100", "sign": "ignored"}));
    let expected = format!("{:X}", md5::compute(format!("amount=100&order_id=A1{}", CBPAY_KEY)));
    assert_eq!(cbpay.sign(&p), expected);
}

#[test]
fn test_winpay_known_signature() {
    let winpay = WinpayStrategy::new(&winpay_config(UNUSED_HOST)).unwrap();
    let p = params(json!({"order": "A1", "amount": "100", "empty": "", "zero": "0"}));
    let expected = format!(
        "{:x}",
        md5::compute(format!("amount=100&order=A1&key={}", WINPAY_KEY))
    );
    assert_eq!(winpay.sign(&p), expected);
}

#[test]
fn test_rsa_round_trip_at_chunk_boundaries() {
    let private = load_private_key(&MERCHANT_KEYS.private_pem).unwrap();
    let public = load_public_key(&MERCHANT_KEYS.public_pem).unwrap();

    for len in [0usize, 1, 116, 117, 118, 234, 235] {
        let plaintext = "z".repeat(len);
        let crypto = private_encrypt(&private, plaintext.as_bytes()).unwrap();
        assert_eq!(crypto.len(), len.div_ceil(117) * 128, "length {}", len);
        assert_eq!(public_decrypt(&public, &crypto).unwrap(), plaintext.as_bytes());
    }
}
