
use async_trait::async_trait;
use mediashare::{
    entities::short_link::{ShortLink, ShortenRequest},
    errors::AppError,
    repositories::{memory::InMemoryShortLinkRepo, short_link::ShortLinkRepository},
    use_cases::shorten::ShortenHandler,
};
use mockall::{mock, Sequence};
use reqwest::{header::LOCATION, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::{TestApp, TEST_API_KEY};

mock! {
    pub LinkRepo {}

    #[async_trait]
    impl ShortLinkRepository for LinkRepo {
        async fn insert_link(&self, link: &ShortLink) -> Result<bool, AppError>;
        async fn get_link(&self, short_id: &str) -> Result<Option<ShortLink>, AppError>;
    }
}

fn request(url: &str) -> ShortenRequest {
    ShortenRequest { url: Some(url.to_string()) }
}

async fn shorten(app: &TestApp, body: Value, key: Option<&str>) -> reqwest::Response {
    let mut request = app.client.put(format!("{}/shorten", app.address)).json(&body);
    if let Some(key) = key {
        request = request.header("Authorization", key);
    }
    request.send().await.expect("Failed to call shorten")
}

#[actix_rt::test]
async fn shortened_link_redirects_to_target() {
    let app = TestApp::spawn().await;

    let response = shorten(&app, json!({"url": "https://example.com/some/long/path?q=1"}), Some(TEST_API_KEY)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let short_url = body["url"].as_str().unwrap().to_string();
    let prefix = format!("{}/l/", app.address);
    assert!(short_url.starts_with(&prefix));

    let short_id = &short_url[prefix.len()..];
    assert_eq!(short_id.len(), 8);
    assert!(short_id.chars().all(|c| c.is_ascii_alphanumeric()));

    let follow = app.client.get(&short_url).send().await.unwrap();
    assert_eq!(follow.status(), StatusCode::FOUND);
    assert_eq!(
        follow.headers()[LOCATION].to_str().unwrap(),
        "https://example.com/some/long/path?q=1"
    );
}

#[actix_rt::test]
async fn same_url_gets_distinct_ids() {
    let app = TestApp::spawn().await;

    let mut urls = Vec::new();
    for _ in 0..3 {
        let body: Value = shorten(&app, json!({"url": "https://example.com"}), Some(TEST_API_KEY))
            .await
            .json()
            .await
            .unwrap();
        urls.push(body["url"].as_str().unwrap().to_string());
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 3);
}

#[actix_rt::test]
async fn shorten_requires_api_key() {
    let app = TestApp::spawn().await;

    let response = shorten(&app, json!({"url": "https://example.com"}), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn missing_or_relative_url_is_rejected() {
    let app = TestApp::spawn().await;

    for body in [json!({}), json!({"url": "not a url"})] {
        let response = shorten(&app, body, Some(TEST_API_KEY)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].as_str().unwrap().contains("url"));
    }
}

#[actix_rt::test]
async fn unknown_short_id_is_not_found() {
    let app = TestApp::spawn().await;

    for id in ["ZZZZZZZZ", "bad-id!"] {
        let response = app.client.get(format!("{}/l/{}", app.address, id)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn id_collisions_are_retried() {
    let mut repo = MockLinkRepo::new();
    let mut seq = Sequence::new();
    repo.expect_insert_link()
        .times(4)
        .in_sequence(&mut seq)
        .returning(|_| Ok(false));
    repo.expect_insert_link()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|link| {
            assert_eq!(link.target_url, "https://example.com/x");
            Ok(true)
        });

    let handler = ShortenHandler::new(Arc::new(repo), "https://s.example");
    let response = handler.shorten(request("https://example.com/x")).await.unwrap();
    assert!(response.url.starts_with("https://s.example/l/"));
}

#[actix_rt::test]
async fn gives_up_after_five_collisions() {
    let mut repo = MockLinkRepo::new();
    repo.expect_insert_link().times(5).returning(|_| Ok(false));

    let handler = ShortenHandler::new(Arc::new(repo), "https://s.example");
    let err = handler.shorten(request("https://example.com")).await.unwrap_err();
    assert!(matches!(err, AppError::InternalError(_)));
}

#[actix_rt::test]
async fn in_memory_links_resolve() {
    let handler = ShortenHandler::new(Arc::new(InMemoryShortLinkRepo::new()), "https://s.example");

    let response = handler.shorten(request("https://example.com/deep")).await.unwrap();
    let short_id = response.url.rsplit('/').next().unwrap();

    assert_eq!(handler.resolve(short_id).await.unwrap(), "https://example.com/deep");
    assert!(matches!(handler.resolve("nope1234").await, Err(AppError::NotFound)));
    assert!(matches!(handler.resolve("../etc").await, Err(AppError::NotFound)));
}
