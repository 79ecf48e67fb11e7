mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["service"], "analytics-service");
}
