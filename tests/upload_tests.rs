
use mediashare::{entities::dimensions::Dimensions, utils::html::escape_html};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use test_utils::{png_bytes, today, CountingProbe, FakeThumbnailer, TestApp, BROWSER_UA};

#[actix_rt::test]
async fn upload_without_key_is_rejected_and_stores_nothing() {
    let app = TestApp::spawn().await;

    let response = app.upload_with_key("cat.png", &png_bytes(), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
    assert!(app.stored_files().is_empty());
}

#[actix_rt::test]
async fn upload_with_wrong_key_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.upload_with_key("cat.png", &png_bytes(), Some("not-the-key")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.stored_files().is_empty());
}

#[actix_rt::test]
async fn upload_without_file_field_is_bad_request() {
    let app = TestApp::spawn().await;

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let response = app
        .client
        .put(format!("{}/upload", app.address))
        .header("Authorization", test_utils::TEST_API_KEY)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("No file uploaded"));
}

#[actix_rt::test]
async fn uploaded_image_is_stored_and_viewable() {
    let app = TestApp::spawn().await;
    let bytes = png_bytes();

    let response = app.upload("cat.png", &bytes).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "File uploaded successfully");
    let locator = body["fileName"].as_str().unwrap().to_string();
    assert_eq!(locator, format!("{}/s/{}/cat.png", app.address, today()));

    let stored = std::fs::read(app.upload_dir.join(today()).join("cat.png")).unwrap();
    assert_eq!(stored, bytes);

    let page = app.client.get(&locator).header("User-Agent", BROWSER_UA).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains(&format!("<img src=\"&#47;f&#47;{}&#47;cat.png\"", today())));
    assert!(html.contains("width=\"640\" height=\"480\""));

    let raw = app
        .client
        .get(format!("{}/f/{}/cat.png", app.address, today()))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), StatusCode::OK);
    assert_eq!(raw.bytes().await.unwrap().to_vec(), bytes);
}

#[actix_rt::test]
async fn second_upload_with_same_name_overwrites() {
    let app = TestApp::spawn().await;

    app.upload("notes.txt", b"first version").await;
    let response = app.upload("notes.txt", b"second").await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = std::fs::read_to_string(app.upload_dir.join(today()).join("notes.txt")).unwrap();
    assert_eq!(stored, "second");
}

#[actix_rt::test]
async fn unsafe_file_name_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.upload("..", b"nope").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stored_files().is_empty());
}

#[actix_rt::test]
async fn video_upload_returns_before_thumbnail_is_ready() {
    let app = TestApp::spawn_with(
        CountingProbe::answering(Dimensions::new(1920, 1080)),
        FakeThumbnailer::delayed(Duration::from_millis(500)),
    )
    .await;

    let response = app.upload("clip.mp4", b"not really a video").await;
    assert_eq!(response.status(), StatusCode::OK);

    let thumbnail = app.upload_dir.join(today()).join("clip.mp4.thumb.jpg");
    assert!(!thumbnail.exists(), "upload response waited for post-processing");

    let mut waited = Duration::ZERO;
    while !thumbnail.exists() && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        waited += Duration::from_millis(50);
    }
    assert!(thumbnail.exists(), "thumbnail never appeared");

    // Give the writer a moment to finish before reading the page.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let html = app
        .view(&format!("/s/{}/clip.mp4", today()), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("<video src="));
    let poster = format!("{}/f/{}/clip.mp4.thumb.jpg", app.address, today());
    assert!(html.contains(&format!("poster=\"{}\"", escape_html(&poster))));
    assert!(html.contains("og:video:width\" content=\"1920\""));
}

#[actix_rt::test]
async fn non_video_upload_starts_no_thumbnail() {
    let app = TestApp::spawn().await;

    app.upload("song.mp3", b"ID3").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(app.thumbnailer.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(app.stored_files().len(), 1);
}

#[actix_rt::test]
async fn upload_over_the_limit_is_refused_and_not_stored() {
    let app = TestApp::spawn_with_upload_limit(1024).await;

    let response = app.upload("big.txt", &vec![b'a'; 4096]).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("1024"));

    assert!(app.stored_files().is_empty());
    let page = app.view(&format!("/s/{}/big.txt", today()), BROWSER_UA).await;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn upload_under_the_limit_is_accepted() {
    let app = TestApp::spawn_with_upload_limit(64 * 1024).await;

    let response = app.upload("small.txt", b"fits easily").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.stored_files().len(), 1);
}
