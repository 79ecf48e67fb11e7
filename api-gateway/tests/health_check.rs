mod common;

use common::TestApp;

#[tokio::test]
async fn health_is_answered_locally() {
    // No routes: nothing upstream could have answered.
    let app = TestApp::spawn(Vec::new()).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["service"], "api-gateway");
}
