mod test_utils;

use reqwest::{multipart, StatusCode};
use serde_json::Value;
use test_utils::*;

const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

fn file_form(bytes: &'static [u8], file_name: &str) -> multipart::Form {
    let part = multipart::Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("application/octet-stream")
        .unwrap();
    multipart::Form::new().part("file", part)
}

#[actix_rt::test]
async fn admin_uploads_image_and_it_is_served() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/upload"))
        .bearer_auth(app.admin_token())
        .multipart(file_form(PNG_BYTES, "screenshot.bin").text("altText", "A screenshot"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let data = &body["data"];
    assert_eq!(data["mimeType"], "image/png");
    assert_eq!(data["altText"], "A screenshot");
    assert_eq!(data["url"], data["imageUrl"]);
    let url = data["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/") && url.ends_with(".png"));

    let served = app.client.get(app.url(url)).send().await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers()["content-type"], "image/png");
    assert_eq!(served.bytes().await.unwrap().as_ref(), PNG_BYTES);
}

#[actix_rt::test]
async fn non_image_is_unsupported_media_type() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/upload"))
        .bearer_auth(app.admin_token())
        .multipart(file_form(b"just some plain text", "notes.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn upload_requires_admin() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/upload"))
        .multipart(file_form(PNG_BYTES, "a.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn unknown_upload_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/uploads/missing.png").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
