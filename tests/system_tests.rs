mod test_utils;

use reqwest::StatusCode;
use test_utils::*;

#[actix_rt::test]
async fn health_reports_in_memory_storage() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storageBackend"], "in-memory");
    assert_eq!(body["data"]["storage"], "OK");
}

#[actix_rt::test]
async fn home_greets_with_owner_name() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Test Owner's Portfolio API!");
}

#[actix_rt::test]
async fn trailing_slash_is_normalized() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/projects/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_rt::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/nothing-here")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
