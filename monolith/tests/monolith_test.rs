mod common;

use common::TestApp;
use serde_json::{json, Value};
use service_core::store::Store;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn(None).await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["service"], "monolith");
}

#[tokio::test]
async fn unconfigured_store_answers_501() {
    let app = TestApp::spawn(None).await;

    for path in ["/customers", "/invoices/abc", "/dashboard/stats", "/currency-rates/convert"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 501, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Database not configured");
    }

    let response = app
        .client
        .post(app.url("/payments"))
        .json(&json!({"invoice_id": "x", "amount": 1, "payment_method": "cash"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 501);
}

#[tokio::test]
async fn notifications_work_without_store() {
    let app = TestApp::spawn(None).await;

    let response = app
        .client
        .post(app.url("/notifications/send"))
        .json(&json!({"to": "ana@example.com", "subject": "Hi", "body": "Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn invoice_flow_runs_in_one_process() {
    let app = TestApp::spawn(Some(Store::memory())).await;

    let customer: Value = app
        .client
        .post(app.url("/customers"))
        .json(&json!({"name": "Ana", "email": "ana@example.com"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let customer_id = customer["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .post(app.url("/invoices"))
        .json(&json!({
            "customer_id": customer_id,
            "items": [{"description": "Design", "quantity": 2, "unit_price": 50}],
            "tax": 0,
            "discount": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let invoice: Value = response.json().await.unwrap();
    let invoice_id = invoice["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .post(app.url("/payments"))
        .json(&json!({"invoice_id": invoice_id, "amount": 100, "payment_method": "bank_transfer"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let stats: Value = app
        .client
        .get(app.url("/dashboard/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["data"]["paid_invoices"], 1);
    assert_eq!(stats["data"]["total_revenue"], json!(100.0));
}
