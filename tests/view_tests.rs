
use mediashare::{repositories::dimensions::DimensionCache, utils::html::escape_html};
use reqwest::{header::LOCATION, StatusCode};
use serde_json::Value;
use test_utils::{png_bytes, CountingProbe, FakeThumbnailer, TestApp, BROWSER_UA, DISCORD_UA};

const DATE: &str = "2024-03-09";

#[actix_rt::test]
async fn dimensions_are_probed_once_per_asset() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "cat.png", &png_bytes());

    for _ in 0..2 {
        let response = app.view(&format!("/s/{DATE}/cat.png"), BROWSER_UA).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.text().await.unwrap();
        assert!(html.contains("width=\"640\" height=\"480\""));
    }

    assert_eq!(app.probe.calls(), 1);
    let record = app.cache.get(&format!("{DATE}/cat.png")).await.unwrap().unwrap();
    assert_eq!((record.width, record.height), (640, 480));
}

#[actix_rt::test]
async fn failed_probe_is_cached_as_unknown() {
    let app = TestApp::spawn_with(CountingProbe::failing(), FakeThumbnailer::instant()).await;
    app.put_asset(DATE, "broken.mp4", b"garbage");

    for _ in 0..2 {
        let response = app.view(&format!("/s/{DATE}/broken.mp4"), BROWSER_UA).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.text().await.unwrap();
        assert!(html.contains("<video src="));
        assert!(!html.contains("width="));
        assert!(!html.contains("og:video:width"));
    }

    assert_eq!(app.probe.calls(), 1);
    let record = app.cache.get(&format!("{DATE}/broken.mp4")).await.unwrap().unwrap();
    assert_eq!((record.width, record.height), (0, 0));
}

#[actix_rt::test]
async fn crawler_is_redirected_to_raw_image() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "cat.png", &png_bytes());

    let response = app.view(&format!("/s/{DATE}/cat.png"), DISCORD_UA).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[LOCATION].to_str().unwrap(),
        format!("{}/f/{DATE}/cat.png", app.address)
    );
    assert_eq!(app.probe.calls(), 0);
}

#[actix_rt::test]
async fn crawler_gets_page_for_video() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "clip.webm", b"webm");

    let response = app.view(&format!("/s/{DATE}/clip.webm"), DISCORD_UA).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("<meta property=\"og:type\" content=\"video.other\">"));
    let raw_url = escape_html(&format!("{}/f/{DATE}/clip.webm", app.address));
    assert!(html.contains(&format!("og:video\" content=\"{raw_url}\"")));
}

#[actix_rt::test]
async fn unknown_type_renders_download_link_without_probing() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "archive.bin", &[0u8; 16]);

    let html = app
        .view(&format!("/s/{DATE}/archive.bin"), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();

    assert!(html.contains(&format!("<a href=\"&#47;f&#47;{DATE}&#47;archive.bin\" download>Download archive.bin</a>")));
    assert_eq!(app.probe.calls(), 0);
}

#[actix_rt::test]
async fn audio_page_points_at_fallback_icon() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "song.mp3", b"ID3");

    let html = app
        .view(&format!("/s/{DATE}/song.mp3"), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();

    assert!(html.contains("<audio src="));
    let icon_url = escape_html(&format!("{}/assets/audio.svg", app.address));
    assert!(html.contains(&format!("og:image\" content=\"{icon_url}\"")));
    assert_eq!(app.probe.calls(), 0);

    let icon = app.client.get(format!("{}/assets/audio.svg", app.address)).send().await.unwrap();
    assert_eq!(icon.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn text_is_escaped_and_truncated() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "xss.txt", b"<script>alert(1)</script>");

    let html = app
        .view(&format!("/s/{DATE}/xss.txt"), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("<pre>&lt;script&gt;alert(1)&lt;&#47;script&gt;</pre>"));
    assert!(!html.contains("<script>"));

    // Preview limit in the test config is 64 bytes.
    app.put_asset(DATE, "long.txt", "x".repeat(200).as_bytes());
    let html = app
        .view(&format!("/s/{DATE}/long.txt"), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!("<pre>{}</pre>", "x".repeat(64))));
    assert!(html.contains("Preview truncated at 64 bytes"));
    assert_eq!(app.probe.calls(), 0);
}

#[actix_rt::test]
async fn site_name_and_file_name_are_escaped() {
    let app = TestApp::spawn().await;
    app.put_asset(DATE, "a&b.bin", b"x");

    let html = app
        .view(&format!("/s/{DATE}/a%26b.bin"), BROWSER_UA)
        .await
        .text()
        .await
        .unwrap();

    assert!(html.contains("<title>a&amp;b.bin | Share&#32;&lt;Test&gt;</title>"));
    assert!(!html.contains("Share <Test>"));
}

#[actix_rt::test]
async fn missing_asset_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.view(&format!("/s/{DATE}/ghost.png"), BROWSER_UA).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not found");
    assert_eq!(app.probe.calls(), 0);
}

#[actix_rt::test]
async fn paths_outside_the_upload_root_are_not_found() {
    let app = TestApp::spawn().await;
    std::fs::write(app.outside_root().join("secret.txt"), "top secret").unwrap();

    let paths = vec![
        "/s/..%2F..%2F/secret.txt".to_string(),
        "/s/2024-13-01/secret.txt".to_string(),
        "/s/2024-1-1/secret.txt".to_string(),
        "/s/not-a-date/secret.txt".to_string(),
        format!("/s/{DATE}/..%2F..%2Fsecret.txt"),
        format!("/s/{DATE}/.."),
    ];
    for path in paths {
        let response = app.view(&path, BROWSER_UA).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path} was served");
    }
}

#[actix_rt::test]
async fn raw_route_stays_inside_the_upload_root() {
    let app = TestApp::spawn().await;
    std::fs::write(app.outside_root().join("secret.txt"), "top secret").unwrap();
    app.put_asset(DATE, "cat.png", &png_bytes());

    let paths = vec![
        "/f/..%2Fsecret.txt".to_string(),
        "/f/%2e%2e/secret.txt".to_string(),
        "/f/%2e%2e%2fsecret.txt".to_string(),
        format!("/f/{DATE}/..%2F..%2Fsecret.txt"),
        format!("/f/{DATE}/%2e%2e/%2e%2e/secret.txt"),
    ];
    for path in paths {
        let response = app.view(&path, BROWSER_UA).await;
        let status = response.status();
        assert!(!status.is_success(), "path {path} answered {status}");
        let body = response.text().await.unwrap();
        assert!(!body.contains("top secret"), "path {path} leaked a file outside the root");
    }

    // The mount itself still serves stored assets.
    let response = app.view(&format!("/f/{DATE}/cat.png"), BROWSER_UA).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn health_reports_cache_database() {
    let app = TestApp::spawn().await;

    let response = app.client.get(format!("{}/health", app.address)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache_database"], "OK");
}
