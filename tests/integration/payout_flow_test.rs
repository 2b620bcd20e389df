// Payout flow against mocked gateways

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use paychannel::core::AppError;
use paychannel::gateways::{GatewayConfig, GatewayFactory, PaymentContext, PayoutRequest};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn received_json(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("request recording");
    let last = requests.last().expect("one request");
    serde_json::from_slice(&last.body).expect("JSON body")
}

async fn mount_ok(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cbpay_payout_sends_destination_as_data_field() {
    let server = MockServer::start().await;
    let body = r#"{"success":true,"msg":"accepted","sys_order_id":"CB-555"}"#;
    mount_ok(&server, "/payout", body).await;

    let context = PaymentContext::new(GatewayFactory::create(&cbpay_config(&server.uri())).unwrap());
    let request = PayoutRequest::new("PO-1", "25000", "Bruno Lima", "bruno@example.com", "");
    let response = context.payout(&request).await.unwrap();

    assert!(response.is_success);
    assert_eq!(response.success_flag, "SUCCESS");
    assert_eq!(response.plat_order_num, "CB-555");
    assert_eq!(response.resp_message, "accepted");
    assert_eq!(response.origin_json, body);

    let sent = received_json(&server).await;
    assert_eq!(sent["mer_id"], "CB1001");
    assert_eq!(sent["amount"], "25000");
    assert_eq!(sent["currency"], "BRL");
    assert_eq!(
        sent["notifyurl"],
        "https://shop.example.com/api/callback/cbpay/payout"
    );
    let data: Value = serde_json::from_str(sent["data"].as_str().unwrap()).unwrap();
    assert_eq!(
        data,
        json!({"accountType": "PIX_EMAIL", "email": "bruno@example.com", "accountName": "Bruno Lima"})
    );
    assert_eq!(sent["sign"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn test_cbpay_payout_rejection() {
    let server = MockServer::start().await;
    mount_ok(
        &server,
        "/payout",
        r#"{"success":false,"msg":"insufficient balance","sys_order_id":""}"#,
    )
    .await;

    let gateway = GatewayFactory::create(&cbpay_config(&server.uri())).unwrap();
    let request = PayoutRequest::new("PO-2", "25000", "Bruno", "+5511988887777", "");
    let response = gateway.payout(&request).await.unwrap();

    assert!(!response.is_success);
    assert_eq!(response.success_flag, "");
    assert_eq!(response.resp_message, "insufficient balance");
}

#[tokio::test]
async fn test_toppay_payout_in_major_units() {
    let server = MockServer::start().await;
    let body = r#"{"platRespCode":"SUCCESS","platRespMessage":"ok","platOrderNum":"TPC-9"}"#;
    Mock::given(method("POST"))
        .and(path("/gateway/cash"))
        .and(body_partial_json(json!({
            "method": "DISBURSEMENT",
            "money": 250,
            "feeType": "0",
            "pixType": "CPF",
            "taxNumber": "12345678901"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = GatewayFactory::create(&toppay_config(&server.uri())).unwrap();
    let request = PayoutRequest::new("PO-3", "25000", "Bruno", "12345678901", "12345678901");
    let response = gateway.payout(&request).await.unwrap();

    assert!(response.is_success);
    assert_eq!(response.plat_order_num, "TPC-9");

    let sent = received_json(&server).await;
    assert!(sent.get("description").is_none());
}

#[tokio::test]
async fn test_winpay_payout_optional_fields() {
    let server = MockServer::start().await;
    let body = r#"{"code":"000000","msg":"ok","order":"WPO-1"}"#;
    mount_ok(&server, "/br/payout.json", body).await;

    let gateway = GatewayFactory::create(&winpay_config(&server.uri())).unwrap();
    let request = PayoutRequest::new("PO-4", "25000", "Bruno", "bruno@example.com", "12345678901")
        .with_wallet_id("W-42");
    let response = gateway.payout(&request).await.unwrap();

    assert!(response.is_success);
    assert_eq!(response.plat_order_num, "WPO-1");
    assert_eq!(response.pay_url, "");

    let sent = received_json(&server).await;
    assert_eq!(sent["walletId"], "W-42");
    assert!(sent.get("cardType").is_none());
    assert_eq!(sent["type"], "PIX");
    assert_eq!(sent["amount"], "25000");
}

#[tokio::test]
async fn test_winpay_payout_uses_configured_fallback_contact() {
    let server = MockServer::start().await;
    mount_ok(&server, "/br/payout.json", r#"{"code":"000000","msg":"ok"}"#).await;

    let gateway = GatewayFactory::create(&winpay_config(&server.uri())).unwrap();
    let request = PayoutRequest::new("PO-5", "25000", "", "", "12345678901");
    gateway.payout(&request).await.unwrap();

    let sent = received_json(&server).await;
    assert_eq!(sent["email"], "payouts@shop.example.com");
    assert_eq!(sent["phone"], "+5511900000000");
    assert_eq!(sent["userName"], "anonymous");
}

#[tokio::test]
async fn test_winpay_payout_without_contact_or_fallback_fails_early() {
    let server = MockServer::start().await;
    let config = GatewayConfig {
        payee_fallback: None,
        ..winpay_config(&server.uri())
    };

    let gateway = GatewayFactory::create(&config).unwrap();
    let request = PayoutRequest::new("PO-6", "25000", "Bruno", "", "12345678901");
    let err = gateway.payout(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
