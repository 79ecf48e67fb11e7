mod common;

use common::{route, TestApp};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn forwards_method_path_query_and_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(query_param("source", "web"))
        .and(header("x-request-id", "req-7"))
        .and(body_json(json!({"name": "Ana", "email": "ana@example.com"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-upstream", "customer")
                .set_body_json(json!({"success": true, "data": {"id": "c-1"}})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(vec![route("/customers", "customer-service", &upstream.uri())]).await;

    let response = app
        .client
        .post(format!("{}/customers?source=web", app.address))
        .header("x-request-id", "req-7")
        .json(&json!({"name": "Ana", "email": "ana@example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(response.headers()["x-upstream"], "customer");
    assert_eq!(response.headers()["x-request-id"], "req-7");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], "c-1");
}

#[tokio::test]
async fn shared_service_owns_both_prefixes() {
    let invoice = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currency-rates/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&invoice)
        .await;
    Mock::given(method("GET"))
        .and(path("/invoices/inv-1/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .insert_header(
                    "content-disposition",
                    "attachment; filename=invoice-INV-2026-0001.pdf",
                )
                .set_body_bytes(b"%PDF-1.3".to_vec()),
        )
        .expect(1)
        .mount(&invoice)
        .await;

    let app = TestApp::spawn(vec![
        route("/invoices", "invoice-service", &invoice.uri()),
        route("/currency-rates", "invoice-service", &invoice.uri()),
    ])
    .await;

    let response = app
        .client
        .get(format!("{}/currency-rates/convert?amount=1", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .client
        .get(format!("{}/invoices/inv-1/pdf", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=invoice-INV-2026-0001.pdf"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"%PDF-1.3");
}

#[tokio::test]
async fn upstream_errors_are_relayed_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"success": false, "error": "Invoice not found"})),
        )
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(vec![route("/invoices", "invoice-service", &upstream.uri())]).await;

    let response = app
        .client
        .get(format!("{}/invoices/missing", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invoice not found");
}

#[tokio::test]
async fn unknown_prefix_is_service_not_found() {
    let app = TestApp::spawn(Vec::new()).await;

    let response = app
        .client
        .get(format!("{}/users/1", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Service not found");
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    // Port 9 (discard) on loopback refuses connections.
    let app = TestApp::spawn(vec![route("/payments", "payment-service", "http://127.0.0.1:9")]).await;

    let response = app
        .client
        .get(format!("{}/payments", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Service unavailable");
}

#[tokio::test]
async fn cors_headers_are_added_at_the_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(vec![route("/customers", "customer-service", &upstream.uri())]).await;

    let response = app
        .client
        .get(format!("{}/customers", app.address))
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
