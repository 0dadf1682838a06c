// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Card API exercised through the router with a real SQLite table and a
//! real on-disk bucket.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use promptdeck_auth::{AuthService, DomainPolicy, SessionRegistry};
use promptdeck_config::model::StorageConfig;
use promptdeck_gateway::{ApiAuth, GalleryLimits, GatewayState, router};
use promptdeck_lifecycle::{CardLifecycle, FileValidator};
use promptdeck_objects::{LocalObjectStore, UrlSigner};
use promptdeck_storage::SqliteRecordStore;
use promptdeck_test_utils::MockAuthProvider;
use promptdeck_test_utils::fixtures::PNG_BYTES;

const TOKEN: &str = "test-token";
const BOUNDARY: &str = "promptdeck-test-boundary";
const COOKIE: &str = "promptdeck_session";
const JPEG_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0];

struct TestApp {
    app: Router,
    objects: Arc<LocalObjectStore>,
    provider: Arc<MockAuthProvider>,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::open(StorageConfig {
        database_path: dir.path().join("cards.db").to_string_lossy().into_owned(),
        wal_mode: true,
    })
    .await
    .unwrap();

    let objects = Arc::new(LocalObjectStore::new(
        dir.path().join("bucket"),
        "test-bucket",
        UrlSigner::new(b"0123456789abcdef0123456789abcdef".to_vec(), "http://localhost"),
    ));
    objects.ensure_folders().await.unwrap();

    let provider = Arc::new(MockAuthProvider::new());
    let sessions = AuthService::new(
        provider.clone(),
        DomainPolicy::new("example.com"),
        Arc::new(SessionRegistry::new(chrono::Duration::hours(1))),
        COOKIE,
    );

    let lifecycle = CardLifecycle::new(
        objects.clone(),
        Arc::new(store),
        FileValidator::default(),
    );
    let state = GatewayState::new(
        lifecycle,
        objects.clone(),
        ApiAuth {
            bearer_token: Some(TOKEN.to_string()),
            sessions: Some(sessions),
        },
        GalleryLimits {
            default_page_size: 50,
            max_page_size: 2,
        },
        Duration::from_secs(600),
    );

    TestApp {
        app: router(state),
        objects,
        provider,
        _dir: dir,
    }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn form_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart(parts)))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, prompt: &str, client: &str) -> Value {
    let response = send(
        app,
        form_request(
            "POST",
            "/v1/cards",
            &[
                Part::File("output_image", "out.png", "image/png", PNG_BYTES),
                Part::File("reference_image", "ref.jpg", "image/jpeg", JPEG_BYTES),
                Part::Text("prompt", prompt),
                Part::Text("metadata", "steps=30"),
                Part::Text("client", client),
                Part::Text("model", "X"),
                Part::Text("seed", "42"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn api_rejects_missing_or_wrong_token() {
    let t = test_app().await;

    let anonymous = Request::builder()
        .uri("/v1/cards")
        .body(Body::empty())
        .unwrap();
    assert_eq!(
        send(&t.app, anonymous).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let wrong = Request::builder()
        .uri("/v1/cards")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&t.app, wrong).await.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(send(&t.app, get("/v1/cards")).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_health_needs_no_token() {
    let t = test_app().await;
    let response = send(
        &t.app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn create_stores_both_images_and_the_row() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;

    assert_eq!(card["prompt"], "a cat");
    assert_eq!(card["client"], "Acme");
    assert_eq!(card["is_favorited"], false);

    let output = card["output_image_path"].as_str().unwrap();
    let reference = card["reference_image_path"].as_str().unwrap();
    assert!(output.starts_with("Output/") && output.ends_with(".png"));
    assert!(reference.starts_with("Reference/") && reference.ends_with(".jpg"));
    assert_eq!(
        t.objects.read(output).await.unwrap().as_deref(),
        Some(PNG_BYTES)
    );

    let id = card["id"].as_str().unwrap();
    let fetched = body_json(send(&t.app, get(&format!("/v1/cards/{id}"))).await).await;
    assert_eq!(fetched["id"], card["id"]);
    assert_eq!(fetched["output_image_path"], card["output_image_path"]);
}

#[tokio::test]
async fn invalid_image_is_422_with_the_field_name() {
    let t = test_app().await;
    let response = send(
        &t.app,
        form_request(
            "POST",
            "/v1/cards",
            &[
                Part::File("output_image", "notes.txt", "text/plain", b"hello"),
                Part::File("reference_image", "ref.jpg", "image/jpeg", JPEG_BYTES),
                Part::Text("prompt", "a cat"),
                Part::Text("metadata", "steps=30"),
                Part::Text("client", "Acme"),
                Part::Text("model", "X"),
                Part::Text("seed", "42"),
            ],
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["field"], "output_image");
    let uploaded = std::fs::read_dir(t.objects.root().join("Output"))
        .unwrap()
        .count();
    assert_eq!(uploaded, 0);
}

#[tokio::test]
async fn missing_required_field_is_422() {
    let t = test_app().await;
    let response = send(
        &t.app,
        form_request(
            "POST",
            "/v1/cards",
            &[
                Part::File("output_image", "out.png", "image/png", PNG_BYTES),
                Part::File("reference_image", "ref.jpg", "image/jpeg", JPEG_BYTES),
                Part::Text("prompt", "a cat"),
                Part::Text("metadata", "steps=30"),
                Part::Text("client", "Acme"),
                Part::Text("model", "X"),
            ],
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("seed"));
}

#[tokio::test]
async fn listing_filters_pages_and_caps_page_size() {
    let t = test_app().await;
    create(&t.app, "one", "Acme").await;
    create(&t.app, "two", "Acme").await;
    create(&t.app, "three", "Other").await;

    let page = body_json(send(&t.app, get("/v1/cards?pageSize=10")).await).await;
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageSize"], 2);
    assert_eq!(page["cards"].as_array().unwrap().len(), 2);
    assert_eq!(page["hasNextPage"], true);

    let acme = body_json(send(&t.app, get("/v1/cards?client=Acme")).await).await;
    assert_eq!(acme["totalCount"], 2);

    let oldest = body_json(send(&t.app, get("/v1/cards?sortBy=oldest")).await).await;
    assert_eq!(oldest["cards"][0]["prompt"], "one");

    let options = body_json(send(&t.app, get("/v1/filter-options")).await).await;
    assert_eq!(options["clients"], json!(["Acme", "Other"]));
    assert_eq!(options["models"], json!(["X"]));

    let bad = send(&t.app, get("/v1/cards?page=0")).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn favorite_toggle_round_trips() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();

    let response = send(
        &t.app,
        json_request(
            "PATCH",
            &format!("/v1/cards/{id}/favorite"),
            json!({ "is_favorited": true }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_favorited"], true);

    let favorites = body_json(send(&t.app, get("/v1/cards?favorites=true")).await).await;
    assert_eq!(favorites["totalCount"], 1);
}

#[tokio::test]
async fn update_replaces_the_output_image_and_removes_the_old_one() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();
    let old_output = card["output_image_path"].as_str().unwrap().to_string();

    let response = send(
        &t.app,
        form_request(
            "PATCH",
            &format!("/v1/cards/{id}"),
            &[
                Part::File("output_image", "new.png", "image/png", PNG_BYTES),
                Part::Text("notes", "second pass"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;

    assert_ne!(updated["output_image_path"], old_output.as_str());
    assert_eq!(updated["reference_image_path"], card["reference_image_path"]);
    assert_eq!(updated["notes"], "second pass");
    assert_eq!(updated["prompt"], "a cat");
    assert_eq!(t.objects.read(&old_output).await.unwrap(), None);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();
    let output = card["output_image_path"].as_str().unwrap();

    let unconfirmed = send(
        &t.app,
        json_request("DELETE", &format!("/v1/cards/{id}"), json!({})),
    )
    .await;
    assert_eq!(unconfirmed.status(), StatusCode::CONFLICT);
    let confirmation = body_json(unconfirmed).await;
    assert_eq!(confirmation["action"], "delete_card");
    assert_eq!(confirmation["card_id"], id);
    assert!(t.objects.read(output).await.unwrap().is_some());

    let confirmed = send(
        &t.app,
        json_request("DELETE", &format!("/v1/cards/{id}?confirm=true"), json!({})),
    )
    .await;
    assert_eq!(confirmed.status(), StatusCode::OK);
    assert_eq!(
        body_json(confirmed).await,
        json!({ "success": true, "refresh_page": 1 })
    );

    assert_eq!(
        send(&t.app, get(&format!("/v1/cards/{id}"))).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(t.objects.read(output).await.unwrap(), None);
}

#[tokio::test]
async fn deleting_the_last_card_on_a_page_steps_back() {
    let t = test_app().await;
    create(&t.app, "one", "Acme").await;
    create(&t.app, "two", "Acme").await;
    let third = create(&t.app, "three", "Acme").await;
    let id = third["id"].as_str().unwrap();

    let response = send(
        &t.app,
        json_request(
            "DELETE",
            &format!("/v1/cards/{id}?confirm=true&page=2&page_size=2&cards_on_page=1"),
            json!({}),
        ),
    )
    .await;
    assert_eq!(body_json(response).await["refresh_page"], 1);
}

#[tokio::test]
async fn signed_urls_serve_images_until_tampered() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();

    let urls = body_json(
        send(
            &t.app,
            json_request("POST", "/v1/cards/urls", json!({ "ids": [id, "missing"] })),
        )
        .await,
    )
    .await;
    let urls = urls.as_array().unwrap();
    assert_eq!(urls.len(), 1);

    let url = urls[0]["output_image_url"].as_str().unwrap();
    let local = url.strip_prefix("http://localhost").unwrap();

    let response = send(
        &t.app,
        Request::builder().uri(local).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, PNG_BYTES);

    let tampered = format!("{local}0");
    let response = send(
        &t.app,
        Request::builder().uri(tampered).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lookup_returns_only_known_cards() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();

    let found = body_json(
        send(
            &t.app,
            json_request("POST", "/v1/cards/lookup", json!({ "ids": [id, "nope"] })),
        )
        .await,
    )
    .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], id);
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
    let t = test_app().await;
    let card = create(&t.app, "a cat", "Acme").await;
    let id = card["id"].as_str().unwrap();

    let response = send(
        &t.app,
        json_request(
            "POST",
            "/v1/export",
            json!({ "ids": [id], "format": "csv" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"prompt-cards-"));
    assert!(disposition.ends_with(".csv\""));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("\"a cat\""));
}

#[tokio::test]
async fn export_without_ids_is_400() {
    let t = test_app().await;
    let response = send(
        &t.app,
        json_request("POST", "/v1/export", json!({ "ids": [] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn magic_link_callback_sets_a_working_session_cookie() {
    let t = test_app().await;
    t.provider.accept("good-code", "ada@example.com").await;

    let response = send(
        &t.app,
        Request::builder()
            .uri("/auth/callback?code=good-code")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with(&format!("{COOKIE}=")));

    let with_cookie = Request::builder()
        .uri("/v1/cards")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&t.app, with_cookie).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn callback_failures_redirect_to_login() {
    let t = test_app().await;
    t.provider.accept("outsider", "eve@elsewhere.org").await;

    let cases = [
        ("/auth/callback", "/auth/login?error=no_code"),
        ("/auth/callback?code=bogus", "/auth/login?error=auth_failed"),
        (
            "/auth/callback?code=outsider",
            "/auth/login?error=invalid_domain",
        ),
    ];
    for (uri, location) in cases {
        let response = send(
            &t.app,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], location, "{uri}");
    }
    assert_eq!(t.provider.sign_out_count(), 1);
}
