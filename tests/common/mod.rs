#![allow(dead_code)]

use kassa_relay::adapters::kassa_client::{ClientOptions, Credentials, KassaClient};
use kassa_relay::domain::error::KassaError;
use kassa_relay::domain::handler::{CaptureHandler, HandlerFuture, SucceedHandler};
use kassa_relay::domain::money::{Amount, Currency};
use kassa_relay::domain::payment::Payment;
use kassa_relay::domain::receipt::{Item, Receipt};
use std::sync::Mutex;
use std::time::Duration;

pub const SHOP_ID: &str = "12345";
pub const SECRET_KEY: &str = "test_secret";
/// base64("12345:test_secret")
pub const BASIC_AUTH: &str = "Basic MTIzNDU6dGVzdF9zZWNyZXQ=";

pub fn client(base_url: &str) -> KassaClient {
    client_with_timeout(base_url, Duration::from_secs(5))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> KassaClient {
    KassaClient::new(
        Credentials::new(SHOP_ID, SECRET_KEY),
        ClientOptions {
            base_url: base_url.to_string(),
            timeout,
        },
    )
    .unwrap()
}

/// A gateway that accepts connections and never writes a byte back.
/// Returns its base URL; the listener lives as long as the test runtime.
pub async fn silent_gateway() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

pub fn rub(value: &str) -> Amount {
    Amount::new(value, Currency::Rub)
}

pub fn email_receipt() -> Receipt {
    Receipt::for_email(
        "user@example.com",
        vec![Item {
            description: "Order #72".into(),
            quantity: "1".into(),
            amount: rub("10.00"),
            vat_code: 1,
        }],
    )
}

// ── Gateway bodies ──────────────────────────────────────────────────────────

pub fn payment_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "paid": status != "pending",
        "amount": {"value": "10.00", "currency": "RUB"},
        "created_at": "2018-07-18T10:51:18.139Z",
        "description": "Order #72",
        "metadata": {},
        "recipient": {"account_id": "100500", "gateway_id": "100700"},
        "test": true
    })
}

pub fn refund_json(id: &str, payment_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "payment_id": payment_id,
        "status": status,
        "amount": {"value": "5.00", "currency": "RUB"},
        "created_at": "2017-10-04T19:27:51.407Z"
    })
}

pub fn processing_json(retry_after: u64) -> serde_json::Value {
    serde_json::json!({
        "type": "InProgress",
        "description": "Request accepted, result not ready yet",
        "retry_after": retry_after
    })
}

pub fn error_json(code: &str, parameter: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "type": "error",
        "id": "ab5a11cd-13cc-4e33-af8b-75a74e18dd09",
        "code": code,
        "description": format!("{code} happened"),
    });
    if let Some(p) = parameter {
        body["parameter"] = p.into();
    }
    body
}

// ── Notification handlers ───────────────────────────────────────────────────

/// Records every payment it is called with; optionally fails each call.
#[derive(Default)]
pub struct RecordingHandler {
    seen: Mutex<Vec<Payment>>,
    fail_with: Option<String>,
}

impl RecordingHandler {
    pub fn failing(msg: &str) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_with: Some(msg.to_string()),
        }
    }

    pub fn seen(&self) -> Vec<Payment> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, payment: &Payment) -> Result<(), KassaError> {
        self.seen.lock().unwrap().push(payment.clone());
        match &self.fail_with {
            Some(msg) => Err(KassaError::Handler(msg.clone())),
            None => Ok(()),
        }
    }
}

impl CaptureHandler for RecordingHandler {
    fn on_waiting_for_capture<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a> {
        Box::pin(async move { self.record(payment) })
    }
}

impl SucceedHandler for RecordingHandler {
    fn on_succeeded<'a>(&'a self, payment: &'a Payment) -> HandlerFuture<'a> {
        Box::pin(async move { self.record(payment) })
    }
}
