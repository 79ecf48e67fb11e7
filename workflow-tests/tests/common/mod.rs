//! Common test utilities for workflow integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use workflow_tests::WorkflowStack;

/// Start the whole stack. Every test gets its own store.
pub async fn setup() -> WorkflowStack {
    WorkflowStack::spawn()
        .await
        .expect("Failed to start workflow stack")
}

pub async fn create_customer(stack: &WorkflowStack, name: &str) -> String {
    let (status, body) = stack
        .post(
            "/customers",
            &json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "company_name": format!("{} Ltd", name)
            }),
        )
        .await
        .unwrap();
    assert_eq!(status, 201, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Two lines of 100, 10% tax and no discount: total 220.
pub async fn create_invoice(stack: &WorkflowStack, customer_id: &str) -> Value {
    let (status, body) = stack
        .post(
            "/invoices",
            &json!({
                "customer_id": customer_id,
                "items": [
                    {"description": "Consulting", "quantity": 1, "unit_price": 100},
                    {"description": "Support", "quantity": 2, "unit_price": 50}
                ],
                "tax": 10,
                "discount": 0,
                "currency": "usd"
            }),
        )
        .await
        .unwrap();
    assert_eq!(status, 201, "{}", body);
    body["data"].clone()
}
