mod test_utils;

use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn me_returns_token_profile() {
    let app = TestApp::spawn().await;

    let response = app.client
        .get(app.url("/api/me"))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "admin@example.com");
    assert_eq!(body["data"]["admin"], true);
}

#[actix_rt::test]
async fn me_requires_token() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/me")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn invalid_or_expired_tokens_are_rejected() {
    let app = TestApp::spawn().await;
    let expired = app
        .state
        .jwt_service
        .issue_token("admin-1", "admin@example.com", true, chrono::Duration::minutes(-10))
        .unwrap();

    for token in [expired.as_str(), "not.a.jwt"] {
        let response = app.client
            .get(app.url("/api/projects"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
    }
}
