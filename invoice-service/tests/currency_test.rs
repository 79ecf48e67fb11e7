mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn seed_rates(app: &TestApp) {
    for (from, to, rate) in [("USD", "IDR", 15500.0), ("SGD", "USD", 0.74), ("EUR", "USD", 1.08)] {
        app.seed(
            "currency_rates",
            json!({ "from_currency": from, "to_currency": to, "rate": rate }),
        )
        .await;
    }
}

#[tokio::test]
async fn rates_are_listed_by_source_currency() {
    let app = TestApp::spawn().await;
    seed_rates(&app).await;

    let (status, body) = app.get_json("/currency-rates").await;
    assert_eq!(status, 200);
    let from: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["from_currency"].as_str().unwrap())
        .collect();
    assert_eq!(from, vec!["EUR", "SGD", "USD"]);
}

#[tokio::test]
async fn converts_with_stored_rate() {
    let app = TestApp::spawn().await;
    seed_rates(&app).await;

    let (status, body) = app
        .get_json("/currency-rates/convert?amount=10&from=usd&to=IDR")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["rate"], json!(15500.0));
    assert_eq!(body["data"]["converted_amount"], json!(155000.0));
    assert_eq!(body["data"]["from"], "USD");
}

#[tokio::test]
async fn same_currency_converts_at_one() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .get_json("/currency-rates/convert?amount=42.5&from=EUR&to=EUR")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["rate"], json!(1.0));
    assert_eq!(body["data"]["converted_amount"], json!(42.5));
}

#[tokio::test]
async fn conversion_errors() {
    let app = TestApp::spawn().await;
    seed_rates(&app).await;

    let (status, body): (u16, Value) = app
        .get_json("/currency-rates/convert?amount=10&from=IDR&to=USD")
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Currency rate not found");

    let (status, body) = app
        .get_json("/currency-rates/convert?amount=ten&from=USD&to=IDR")
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid amount");

    let (status, _) = app.get_json("/currency-rates/convert?from=USD").await;
    assert_eq!(status, 400);
}
