// Integration tests for the Cliptide API
// Run with: cargo test --test api_workflow
//
// Every test builds its own router on the in-memory backend and drives
// it with tower::oneshot, so no server or database needs to be running.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use cliptide_api::api;
use cliptide_api::auth::{AuthConfig, AuthState, JwtConfig};
use cliptide_api::media::MediaStore;
use cliptide_api::services::{
    CommentService, DashboardService, LikeService, PlaylistService, SubscriptionService,
    TweetService, UserService, VideoService,
};
use cliptide_api::storage::StorageBackend;

const PASSWORD: &str = "Str0ng!pass";
const NEW_PASSWORD: &str = "N3w!secret";
const BOUNDARY: &str = "cliptide-test-boundary";

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt: JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            ..JwtConfig::default()
        },
    }
}

// MediaStore::local only creates the media root, so the spool directory
// has to exist before the first upload
fn test_media() -> MediaStore {
    let base = std::env::temp_dir().join(format!("cliptide-test-{}", Uuid::now_v7()));
    let root = base.join("media");
    let temp = base.join("tmp");
    std::fs::create_dir_all(&temp).expect("create temp dir");
    MediaStore::local(root, "http://localhost:8000/media".to_string(), temp)
        .expect("create media store")
}

/// Build the full route surface on a fresh in-memory backend, wired the
/// same way the server binary wires it
fn test_app() -> Router {
    let db = StorageBackend::in_memory();
    let media = test_media();
    let auth_state = AuthState::new(test_auth_config(), db.clone());
    let jwt = auth_state.jwt_service.clone();

    let user_service = Arc::new(UserService::new(db.clone(), jwt, media.clone()));
    let video_service = Arc::new(VideoService::new(db.clone(), media.clone()));

    Router::new()
        .merge(api::healthcheck::routes())
        .merge(api::users::routes(api::users::AppState::new(
            user_service,
            auth_state.clone(),
            media.clone(),
        )))
        .merge(api::videos::routes(api::videos::AppState::new(
            video_service,
            auth_state.clone(),
            media.clone(),
        )))
        .merge(api::comments::routes(api::comments::AppState::new(
            Arc::new(CommentService::new(db.clone())),
            auth_state.clone(),
        )))
        .merge(api::likes::routes(api::likes::AppState::new(
            Arc::new(LikeService::new(db.clone())),
            auth_state.clone(),
        )))
        .merge(api::playlists::routes(api::playlists::AppState::new(
            Arc::new(PlaylistService::new(db.clone())),
            auth_state.clone(),
        )))
        .merge(api::subscriptions::routes(
            api::subscriptions::AppState::new(
                Arc::new(SubscriptionService::new(db.clone())),
                auth_state.clone(),
            ),
        ))
        .merge(api::tweets::routes(api::tweets::AppState::new(
            Arc::new(TweetService::new(db.clone())),
            auth_state.clone(),
        )))
        .merge(api::dashboard::routes(api::dashboard::AppState::new(
            Arc::new(DashboardService::new(db)),
            auth_state,
        )))
}

// =============================================================================
// Request helpers
// =============================================================================

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

fn multipart_text(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn multipart_file(body: &mut Vec<u8>, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

fn multipart_request(method: &str, uri: &str, token: Option<&str>, mut body: Vec<u8>) -> Request<Body> {
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse json body")
    };
    (status, body)
}

/// Register a user with `<username>@example.com` and a png avatar,
/// returning the created user payload
async fn register_user(app: &Router, username: &str) -> Value {
    let mut body = Vec::new();
    multipart_text(&mut body, "username", username);
    multipart_text(&mut body, "email", &format!("{username}@example.com"));
    multipart_text(&mut body, "fullname", "Test User");
    multipart_text(&mut body, "password", PASSWORD);
    multipart_file(&mut body, "avatar", "avatar.png", "image/png", b"avatar-bytes");

    let (status, response) = send(
        app,
        multipart_request("POST", "/v1/users/register", None, body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {response}");
    response["data"].clone()
}

async fn login_user(app: &Router, username: &str) -> String {
    let (status, response) = send(
        app,
        json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "username": username, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {response}");
    response["data"]["accessToken"]
        .as_str()
        .expect("access token")
        .to_string()
}

/// Publish a small mp4 with a png thumbnail, returning the video payload
async fn publish_video(app: &Router, token: &str, title: &str) -> Value {
    let mut body = Vec::new();
    multipart_text(&mut body, "title", title);
    multipart_text(&mut body, "description", "A test clip");
    multipart_file(&mut body, "videoFile", "clip.mp4", "video/mp4", b"mp4-bytes");
    multipart_file(&mut body, "thumbnail", "thumb.png", "image/png", b"png-bytes");

    let (status, response) = send(
        app,
        multipart_request("POST", "/v1/videos", Some(token), body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "publish failed: {response}");
    response["data"].clone()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_register_login_and_session_lifecycle() {
    let app = test_app();

    println!("📝 Step 1: Registering a user...");
    let user = register_user(&app, "chai").await;
    assert_eq!(user["username"], "chai");
    assert_eq!(user["email"], "chai@example.com");
    assert_eq!(user["fullname"], "Test User");
    let avatar = user["avatar"].as_str().expect("avatar url");
    assert!(avatar.starts_with("http"), "avatar should be a url: {avatar}");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("refreshTokenHash").is_none());
    println!("✅ Registered user {}", user["id"]);

    println!("\n📝 Step 2: Duplicate registration is rejected...");
    let mut body = Vec::new();
    multipart_text(&mut body, "username", "chai");
    multipart_text(&mut body, "email", "other@example.com");
    multipart_text(&mut body, "fullname", "Test User");
    multipart_text(&mut body, "password", PASSWORD);
    multipart_file(&mut body, "avatar", "avatar.png", "image/png", b"avatar-bytes");
    let (status, response) = send(
        &app,
        multipart_request("POST", "/v1/users/register", None, body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["message"], "User already exists");
    assert_eq!(response["success"], false);
    println!("✅ Duplicate rejected with 409");

    println!("\n🔑 Step 3: Bad credentials are rejected...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "username": "chai", "password": "Wr0ng!pass" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Invalid credentials");

    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "username": "nobody", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "User not found");
    println!("✅ Wrong password 401, unknown user 404");

    println!("\n🔑 Step 4: Logging in...");
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "email": "chai@example.com", "password": PASSWORD })),
        ))
        .await
        .expect("login request");
    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("cookie header").to_string())
        .collect();
    assert!(
        cookies.iter().any(|c| c.starts_with("accessToken=")),
        "missing access cookie: {cookies:?}"
    );
    assert!(
        cookies.iter().any(|c| c.starts_with("refreshToken=")),
        "missing refresh cookie: {cookies:?}"
    );
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let login: Value = serde_json::from_slice(&bytes).expect("login body");
    assert_eq!(login["message"], "User logged in successfully");
    assert_eq!(login["data"]["user"]["username"], "chai");
    let access1 = login["data"]["accessToken"].as_str().expect("access").to_string();
    let refresh1 = login["data"]["refreshToken"].as_str().expect("refresh").to_string();
    println!("✅ Logged in, both tokens set as HttpOnly cookies");

    println!("\n👤 Step 5: Fetching the current user...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/current-user", Some(&access1), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Current user fetched successfully");
    assert_eq!(response["data"]["username"], "chai");

    println!("\n🔄 Step 6: Rotating the session...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/refresh-token",
            None,
            Some(json!({ "refreshToken": refresh1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "refresh failed: {response}");
    assert_eq!(response["message"], "Access token refreshed");
    let access2 = response["data"]["accessToken"].as_str().expect("access").to_string();
    let refresh2 = response["data"]["refreshToken"].as_str().expect("refresh").to_string();
    assert_ne!(refresh2, refresh1, "rotation must mint a new refresh token");
    println!("✅ Session rotated");

    println!("\n🔄 Step 7: Replaying the superseded refresh token...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/refresh-token",
            None,
            Some(json!({ "refreshToken": refresh1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Invalid refresh token");
    println!("✅ Old refresh token is dead after rotation");

    println!("\n🔒 Step 8: Changing the password...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            "/v1/users/change-password",
            Some(&access2),
            Some(json!({ "oldPassword": "Wr0ng!pass", "newPassword": NEW_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Old password is incorrect");

    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            "/v1/users/change-password",
            Some(&access2),
            Some(json!({ "oldPassword": PASSWORD, "newPassword": NEW_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "change password failed: {response}");
    assert_eq!(response["message"], "Password changed successfully");
    println!("✅ Password changed");

    println!("\n🔑 Step 9: Old password no longer logs in...");
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "username": "chai", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/login",
            None,
            Some(json!({ "username": "chai", "password": NEW_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access3 = response["data"]["accessToken"].as_str().expect("access").to_string();
    let refresh3 = response["data"]["refreshToken"].as_str().expect("refresh").to_string();
    println!("✅ New password works");

    println!("\n🚪 Step 10: Logging out kills the session...");
    let (status, response) = send(
        &app,
        json_request("POST", "/v1/users/logout", Some(&access3), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "User logged out successfully");

    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/users/refresh-token",
            None,
            Some(json!({ "refreshToken": refresh3 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Invalid refresh token");
    println!("✅ Refresh after logout rejected");
}

#[tokio::test]
async fn test_register_validation_reports_every_failure() {
    let app = test_app();

    // Bad username charset, bad email, short fullname, weak password
    let mut body = Vec::new();
    multipart_text(&mut body, "username", "C!");
    multipart_text(&mut body, "email", "not-an-email");
    multipart_text(&mut body, "fullname", "x");
    multipart_text(&mut body, "password", "weak");
    multipart_file(&mut body, "avatar", "avatar.png", "image/png", b"avatar-bytes");

    let (status, response) = send(
        &app,
        multipart_request("POST", "/v1/users/register", None, body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Validation failed");
    let errors = response["errors"].as_array().expect("errors array");
    assert!(
        errors.len() >= 5,
        "expected every field failure reported, got {errors:?}"
    );
    assert_eq!(response["data"], Value::Null);
}

#[tokio::test]
async fn test_rejects_unauthenticated_requests() {
    let app = test_app();

    for (method, uri) in [
        ("GET", "/v1/videos"),
        ("GET", "/v1/users/current-user"),
        ("GET", "/v1/users/watch-history"),
        ("GET", "/v1/likes/videos"),
        ("GET", "/v1/dashboard/stats"),
    ] {
        let (status, response) = send(&app, json_request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response["message"], "Unauthorized request", "{method} {uri}");
        assert_eq!(response["success"], false);
    }

    // A syntactically valid header with a garbage token fails the same way
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/current-user", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Unauthorized request");

    // Health never needs credentials
    let (status, response) = send(&app, json_request("GET", "/v1/healthcheck", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"], "OK");
}

#[tokio::test]
async fn test_video_lifecycle_ownership_and_visibility() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;

    println!("🎬 Step 1: Publishing a video...");
    let video = publish_video(&app, &alice_token, "My First Video").await;
    let video_id = id_of(&video);
    assert_eq!(video["title"], "My First Video");
    assert_eq!(video["isPublished"], true);
    assert_eq!(video["views"], 0);
    assert_eq!(video["owner"], alice["id"]);
    assert!(video["videoFile"].as_str().expect("url").starts_with("http"));
    assert!(video["thumbnail"].as_str().expect("url").starts_with("http"));
    println!("✅ Published video {video_id}");

    println!("\n🎬 Step 2: Upload without a file is rejected...");
    let mut body = Vec::new();
    multipart_text(&mut body, "title", "No file here");
    let (status, response) = send(
        &app,
        multipart_request("POST", "/v1/videos", Some(&alice_token), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Video and thumbnail are required");

    println!("\n🔒 Step 3: Non-owners cannot mutate...");
    let mut body = Vec::new();
    multipart_text(&mut body, "title", "Hijacked");
    let (status, response) = send(
        &app,
        multipart_request(
            "PATCH",
            &format!("/v1/videos/{video_id}"),
            Some(&bob_token),
            body,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to update this video");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/videos/{video_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to delete this video");

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/videos/toggle/publish/{video_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    println!("✅ All mutations forbidden for non-owners");

    println!("\n✏️  Step 4: The owner edits the video...");
    let mut body = Vec::new();
    multipart_text(&mut body, "title", "My First Video (redux)");
    multipart_text(&mut body, "description", "Now with a better intro");
    let (status, response) = send(
        &app,
        multipart_request(
            "PATCH",
            &format!("/v1/videos/{video_id}"),
            Some(&alice_token),
            body,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {response}");
    assert_eq!(response["message"], "Video updated successfully");
    assert_eq!(response["data"]["title"], "My First Video (redux)");
    assert_eq!(response["data"]["description"], "Now with a better intro");

    println!("\n🙈 Step 5: Unpublishing hides the video from others...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/videos/toggle/publish/{video_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Video unpublished");
    assert_eq!(response["data"]["isPublished"], false);

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/videos/{video_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "This video is not public");

    // The owner still sees it, and the view counts
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/videos/{video_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["views"], 1);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 0, "unpublished video leaked into the feed");
    println!("✅ Unpublished video hidden from the feed and other users");

    println!("\n📣 Step 6: Republish and delete...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/videos/toggle/publish/{video_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Video published");

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 1);

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/videos/{video_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Video deleted successfully");

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/videos/{video_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Video not found");
    println!("✅ Video gone after delete");
}

#[tokio::test]
async fn test_video_feed_search_sort_and_pagination() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;
    let alice_id = id_of(&alice);

    let alpha = publish_video(&app, &alice_token, "Alpha guide").await;
    let _beta = publish_video(&app, &alice_token, "Beta guide").await;
    let gamma = publish_video(&app, &alice_token, "Gamma walkthrough").await;

    println!("📋 Step 1: Default feed is newest first...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Videos fetched successfully");
    let page = &response["data"];
    assert_eq!(page["totalDocs"], 3);
    assert_eq!(page["docs"][0]["id"], gamma["id"]);
    assert_eq!(page["docs"][0]["owner"]["username"], "alice");
    println!("✅ Feed ordered and owner resolved");

    println!("\n🔍 Step 2: Search matches title and description...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos?query=guide", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 2);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos?query=WALK", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 1, "search should be case-insensitive");

    println!("\n📄 Step 3: Pagination splits the feed...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos?limit=2&page=1", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = &response["data"];
    assert_eq!(page["docs"].as_array().expect("docs").len(), 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasNextPage"], true);
    assert_eq!(page["hasPrevPage"], false);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos?limit=2&page=2", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = &response["data"];
    assert_eq!(page["docs"].as_array().expect("docs").len(), 1);
    assert_eq!(page["hasPrevPage"], true);

    println!("\n👀 Step 4: Sorting by views...");
    // Two views for Alpha, none for the others
    let alpha_id = id_of(&alpha);
    for _ in 0..2 {
        let (status, _) = send(
            &app,
            json_request(
                "GET",
                &format!("/v1/videos/{alpha_id}"),
                Some(&bob_token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            "/v1/videos?sortBy=views&sortType=desc",
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["docs"][0]["id"], alpha["id"]);
    assert_eq!(response["data"]["docs"][0]["views"], 2);

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            "/v1/videos?sortBy=createdAt&sortType=asc",
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["docs"][0]["id"], alpha["id"], "asc puts the oldest first");

    println!("\n🗂  Step 5: Owner filter includes unpublished videos...");
    let gamma_id = id_of(&gamma);
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/videos/toggle/publish/{gamma_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 2);

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/videos?userId={alice_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 3, "owner filter shows drafts too");

    println!("\n🚫 Step 6: Bad query parameters are rejected...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/videos?sortBy=title", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "sortBy must be one of createdAt, views, duration"));

    let (status, _) = send(
        &app,
        json_request("GET", "/v1/videos?page=0", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("GET", "/v1/videos?sortType=sideways", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    println!("✅ Sort and pagination validation holds");
}

#[tokio::test]
async fn test_account_and_profile_image_updates() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let token = login_user(&app, "alice").await;

    println!("✏️  Step 1: Updating account details...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            "/v1/users/update-account",
            Some(&token),
            Some(json!({ "fullname": "Updated Name", "email": "updated@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "update failed: {response}");
    assert_eq!(response["message"], "Account details updated successfully");
    assert_eq!(response["data"]["fullname"], "Updated Name");
    assert_eq!(response["data"]["email"], "updated@example.com");

    println!("\n🚫 Step 2: Conflicting email is rejected...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            "/v1/users/update-account",
            Some(&token),
            Some(json!({ "email": "bob@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["message"], "Email is already in use by another account");

    println!("\n🚫 Step 3: Empty and malformed updates are rejected...");
    let (status, response) = send(
        &app,
        json_request("PATCH", "/v1/users/update-account", Some(&token), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "fullname or email is required"));

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/v1/users/update-account",
            Some(&token),
            Some(json!({ "fullname": "X1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    println!("\n🖼  Step 4: Replacing the avatar...");
    let old_avatar = alice["avatar"].as_str().expect("avatar").to_string();
    let mut body = Vec::new();
    multipart_file(&mut body, "avatar", "new-avatar.png", "image/png", b"new-avatar");
    let (status, response) = send(
        &app,
        multipart_request("PATCH", "/v1/users/update-avatar", Some(&token), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "avatar update failed: {response}");
    assert_eq!(response["message"], "Avatar updated successfully");
    let new_avatar = response["data"]["avatar"].as_str().expect("avatar");
    assert!(new_avatar.starts_with("http"));
    assert_ne!(new_avatar, old_avatar);

    // Missing file part
    let (status, response) = send(
        &app,
        multipart_request("PATCH", "/v1/users/update-avatar", Some(&token), Vec::new()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Avatar is required");

    println!("\n🖼  Step 5: Adding a cover image...");
    let mut body = Vec::new();
    multipart_file(&mut body, "coverImage", "cover.png", "image/png", b"cover-bytes");
    let (status, response) = send(
        &app,
        multipart_request("PATCH", "/v1/users/update-cover-image", Some(&token), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "cover update failed: {response}");
    assert_eq!(response["message"], "Cover image updated successfully");
    assert!(response["data"]["coverImage"]
        .as_str()
        .expect("cover url")
        .starts_with("http"));
    println!("✅ Account and images updated");
}

#[tokio::test]
async fn test_comment_thread_flow() {
    let app = test_app();
    register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;
    let video = publish_video(&app, &alice_token, "Commentable").await;
    let video_id = id_of(&video);

    println!("💬 Step 1: Adding comments...");
    let mut comment_ids = Vec::new();
    for (token, content) in [
        (&bob_token, "First!"),
        (&alice_token, "Nice editing"),
        (&bob_token, "Came back to say it holds up"),
    ] {
        let (status, response) = send(
            &app,
            json_request(
                "POST",
                &format!("/v1/comments/{video_id}"),
                Some(token),
                Some(json!({ "content": content })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "comment failed: {response}");
        assert_eq!(response["message"], "Comment added successfully");
        comment_ids.push(id_of(&response["data"]));
    }

    println!("\n📄 Step 2: Listing newest first with pagination...");
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/comments/{video_id}?page=1&limit=2"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Comments fetched successfully");
    let page = &response["data"];
    assert_eq!(page["totalDocs"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["docs"][0]["content"], "Came back to say it holds up");
    assert_eq!(page["docs"][0]["owner"]["username"], "bob");

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/comments/{video_id}?page=2&limit=2"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["docs"][0]["content"], "First!");

    println!("\n🚫 Step 3: Invalid comments are rejected...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/comments/{video_id}"),
            Some(&bob_token),
            Some(json!({ "content": "   " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "content is required"));

    let missing = Uuid::now_v7();
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/comments/{missing}"),
            Some(&bob_token),
            Some(json!({ "content": "Ghost comment" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Video not found");

    println!("\n✏️  Step 4: Only the author can edit or delete...");
    let bob_comment = &comment_ids[0];
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/comments/c/{bob_comment}"),
            Some(&alice_token),
            Some(json!({ "content": "Hijacked" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to update this comment");

    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/comments/c/{bob_comment}"),
            Some(&bob_token),
            Some(json!({ "content": "First! (edited)" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Comment updated successfully");
    assert_eq!(response["data"]["content"], "First! (edited)");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/comments/c/{bob_comment}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to delete this comment");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/comments/c/{bob_comment}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Comment deleted successfully");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/comments/c/{bob_comment}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Comment not found");

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/comments/{video_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalDocs"], 2);
    println!("✅ Comment thread behaves");
}

#[tokio::test]
async fn test_like_toggles_on_every_target() {
    let app = test_app();
    register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;

    let video = publish_video(&app, &alice_token, "Likeable").await;
    let video_id = id_of(&video);

    let (_, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/tweets",
            Some(&alice_token),
            Some(json!({ "content": "Shipping a new upload today" })),
        ),
    )
    .await;
    let tweet_id = id_of(&response["data"]);

    let (_, response) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/comments/{video_id}"),
            Some(&bob_token),
            Some(json!({ "content": "Great video!" })),
        ),
    )
    .await;
    let comment_id = id_of(&response["data"]);

    println!("❤️  Step 1: Toggling a video like on, off, on...");
    let uri = format!("/v1/likes/toggle/v/{video_id}");
    let (status, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Video liked successfully");

    let (_, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(response["message"], "Video like removed");

    let (_, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(response["message"], "Video liked successfully");

    println!("\n❤️  Step 2: Likes are per-user...");
    let (_, response) = send(&app, json_request("POST", &uri, Some(&alice_token), None)).await;
    assert_eq!(response["message"], "Video liked successfully");

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/likes/videos", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Liked videos fetched successfully");
    assert_eq!(response["data"]["total"], 1);
    assert_eq!(response["data"]["videoIds"][0], video["id"]);

    println!("\n❤️  Step 3: Comments and tweets toggle the same way...");
    let uri = format!("/v1/likes/toggle/c/{comment_id}");
    let (_, response) = send(&app, json_request("POST", &uri, Some(&alice_token), None)).await;
    assert_eq!(response["message"], "Comment liked successfully");

    let uri = format!("/v1/likes/toggle/t/{tweet_id}");
    let (_, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(response["message"], "Tweet liked successfully");
    let (_, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(response["message"], "Tweet like removed");

    println!("\n🚫 Step 4: Unknown targets are 404s...");
    let missing = Uuid::now_v7();
    for (uri, message) in [
        (format!("/v1/likes/toggle/v/{missing}"), "Video not found"),
        (format!("/v1/likes/toggle/c/{missing}"), "Comment not found"),
        (format!("/v1/likes/toggle/t/{missing}"), "Tweet not found"),
    ] {
        let (status, response) =
            send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response["message"], message, "{uri}");
    }
    println!("✅ Like toggles behave");
}

#[tokio::test]
async fn test_playlist_flow() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;
    let alice_id = id_of(&alice);

    println!("📚 Step 1: Creating a playlist...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/playlists",
            Some(&alice_token),
            Some(json!({ "name": "Watch later", "description": "Queue for the weekend" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {response}");
    assert_eq!(response["message"], "Playlist created successfully");
    let playlist_id = id_of(&response["data"]);
    assert_eq!(response["data"]["name"], "Watch later");
    assert_eq!(response["data"]["videos"], json!([]));

    println!("\n🚫 Step 2: Names are unique and validated...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/playlists",
            Some(&bob_token),
            Some(json!({ "name": "Watch later" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Playlist name already exists");

    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/playlists",
            Some(&alice_token),
            Some(json!({ "name": "ab" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "name must be between 3 and 50 characters"));

    println!("\n➕ Step 3: Adding and removing videos...");
    let video = publish_video(&app, &alice_token, "Playlist fodder").await;
    let video_id = id_of(&video);

    let add_uri = format!("/v1/playlists/{playlist_id}/add/{video_id}");
    let (status, response) = send(
        &app,
        json_request("PATCH", &add_uri, Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add failed: {response}");
    assert_eq!(response["message"], "Video added to playlist successfully");
    assert_eq!(response["data"]["videos"][0], video["id"]);

    let (status, response) = send(
        &app,
        json_request("PATCH", &add_uri, Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Video already in playlist");

    let missing = Uuid::now_v7();
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/playlists/{playlist_id}/add/{missing}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Video not found");

    let (status, response) = send(
        &app,
        json_request("PATCH", &add_uri, Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to modify this playlist");

    println!("\n📖 Step 4: Reading the playlist resolves videos...");
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Playlist fetched successfully");
    let videos = response["data"]["videos"].as_array().expect("videos");
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "Playlist fodder");

    println!("\n✏️  Step 5: Only the owner edits...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&bob_token),
            Some(json!({ "name": "Stolen" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to update this playlist");

    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&alice_token),
            Some(json!({ "name": "Weekend queue", "description": "Renamed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Playlist updated successfully");
    assert_eq!(response["data"]["name"], "Weekend queue");

    println!("\n➖ Step 6: Removing a video...");
    let remove_uri = format!("/v1/playlists/{playlist_id}/remove/{video_id}");
    let (status, response) = send(
        &app,
        json_request("PATCH", &remove_uri, Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Video removed from playlist successfully");
    assert_eq!(response["data"]["videos"], json!([]));

    let (status, response) = send(
        &app,
        json_request("PATCH", &remove_uri, Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Video not found in playlist");

    println!("\n🗑  Step 7: Listing and deleting...");
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/playlists/user/{alice_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Playlists fetched successfully");
    assert_eq!(response["data"].as_array().expect("playlists").len(), 1);

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to delete this playlist");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Playlist deleted successfully");

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/playlists/{playlist_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Playlist not found");
    println!("✅ Playlist lifecycle behaves");
}

#[tokio::test]
async fn test_subscriptions_and_channel_profile() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let carol = register_user(&app, "carol").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;
    let carol_token = login_user(&app, "carol").await;
    let alice_id = id_of(&alice);
    let carol_id = id_of(&carol);

    println!("🔔 Step 1: Subscribing returns 201, unsubscribing 200...");
    let uri = format!("/v1/subscriptions/c/{alice_id}");
    let (status, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["message"], "Subscribed successfully");
    assert_eq!(response["data"]["subscribed"], true);

    let (status, response) = send(&app, json_request("POST", &uri, Some(&carol_token), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["subscribed"], true);

    let (status, response) = send(&app, json_request("POST", &uri, Some(&bob_token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Unsubscribed successfully");
    assert_eq!(response["data"]["subscribed"], false);

    println!("\n🚫 Step 2: Self-subscription and unknown channels fail...");
    let (status, response) = send(&app, json_request("POST", &uri, Some(&alice_token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "You cannot subscribe to yourself");

    let missing = Uuid::now_v7();
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/subscriptions/c/{missing}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Channel not found");

    println!("\n📋 Step 3: Both sides of the edge list correctly...");
    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/subscriptions/c/{alice_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Channel subscribers fetched successfully");
    let subscribers = response["data"].as_array().expect("subscribers");
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0]["subscriber"]["username"], "carol");

    let (status, response) = send(
        &app,
        json_request(
            "GET",
            &format!("/v1/subscriptions/u/{carol_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Subscribed channels fetched successfully");
    let channels = response["data"].as_array().expect("channels");
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0]["channel"]["username"], "alice");

    println!("\n📺 Step 4: Channel profile aggregates per viewer...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/c/alice", Some(&carol_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Channel profile fetched successfully");
    let profile = &response["data"];
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["subscribersCount"], 1);
    assert_eq!(profile["channelsSubscribedToCount"], 0);
    assert_eq!(profile["isSubscribed"], true);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/c/alice", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["isSubscribed"], false);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/c/nobody", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Channel not found");
    println!("✅ Subscriptions and profiles agree");
}

#[tokio::test]
async fn test_tweet_flow() {
    let app = test_app();
    let alice = register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;

    println!("🐦 Step 1: Posting tweets...");
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/tweets",
            Some(&alice_token),
            Some(json!({ "content": "First post" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["message"], "Tweet created successfully");
    assert_eq!(response["data"]["owner"], alice["id"]);
    let first_id = id_of(&response["data"]);

    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/tweets",
            Some(&alice_token),
            Some(json!({ "content": "Second post" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = id_of(&response["data"]);

    println!("\n🚫 Step 2: Length and emptiness are enforced...");
    let over_limit = "x".repeat(281);
    let (status, response) = send(
        &app,
        json_request(
            "POST",
            "/v1/tweets",
            Some(&alice_token),
            Some(json!({ "content": over_limit })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "content must be at most 280 characters"));

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/tweets",
            Some(&alice_token),
            Some(json!({ "content": "   " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    println!("\n📋 Step 3: Listing by username, newest first...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/tweets/user/alice", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Tweets fetched successfully");
    let tweets = response["data"].as_array().expect("tweets");
    assert_eq!(tweets.len(), 2);
    assert_eq!(id_of(&tweets[0]), second_id);
    assert_eq!(id_of(&tweets[1]), first_id);

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/tweets/user/nobody", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "User not found");

    println!("\n✏️  Step 4: Only the author edits or deletes...");
    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/tweets/{first_id}"),
            Some(&bob_token),
            Some(json!({ "content": "Hijacked" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to update this tweet");

    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/tweets/{first_id}"),
            Some(&alice_token),
            Some(json!({ "content": "First post (edited)" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Tweet updated successfully");
    assert_eq!(response["data"]["content"], "First post (edited)");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/tweets/{first_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Not authorized to delete this tweet");

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/v1/tweets/{first_id}"),
            Some(&alice_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Tweet deleted successfully");

    let (status, response) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/v1/tweets/{first_id}"),
            Some(&alice_token),
            Some(json!({ "content": "Too late" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Tweet not found");
    println!("✅ Tweet lifecycle behaves");
}

#[tokio::test]
async fn test_dashboard_stats_and_watch_history() {
    let app = test_app();
    register_user(&app, "alice").await;
    register_user(&app, "bob").await;
    let alice_token = login_user(&app, "alice").await;
    let bob_token = login_user(&app, "bob").await;

    let first = publish_video(&app, &alice_token, "First clip").await;
    let second = publish_video(&app, &alice_token, "Second clip").await;
    let first_id = id_of(&first);
    let second_id = id_of(&second);

    println!("📈 Step 1: Generating channel activity...");
    let alice_profile = send(
        &app,
        json_request("GET", "/v1/users/c/alice", Some(&bob_token), None),
    )
    .await
    .1;
    let alice_id = alice_profile["data"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/subscriptions/c/{alice_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/v1/likes/toggle/v/{first_id}"),
            Some(&bob_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Bob watches the first clip, the second, then the first again
    for video_id in [&first_id, &second_id, &first_id] {
        let (status, _) = send(
            &app,
            json_request(
                "GET",
                &format!("/v1/videos/{video_id}"),
                Some(&bob_token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    println!("\n📊 Step 2: Channel stats aggregate everything...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/dashboard/stats", Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Channel stats fetched successfully");
    let stats = &response["data"];
    assert_eq!(stats["totalVideos"], 2);
    assert_eq!(stats["totalViews"], 3);
    assert_eq!(stats["totalSubscribers"], 1);
    assert_eq!(stats["totalLikes"], 1);

    // A channel with no activity reports zeros
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/dashboard/stats", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["totalVideos"], 0);
    assert_eq!(response["data"]["totalSubscribers"], 0);

    println!("\n📊 Step 3: Dashboard videos page with a hard cap...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/dashboard/videos?limit=1", Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Channel videos fetched successfully");
    let page = &response["data"];
    assert_eq!(page["totalDocs"], 2);
    assert_eq!(page["docs"].as_array().expect("docs").len(), 1);
    assert!(page["docs"][0]["title"].is_string());

    let (status, response) = send(
        &app,
        json_request("GET", "/v1/dashboard/videos?limit=51", Some(&alice_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .any(|e| e == "limit must be at most 50"));

    println!("\n🕘 Step 4: Watch history dedupes and reorders on rewatch...");
    let (status, response) = send(
        &app,
        json_request("GET", "/v1/users/watch-history", Some(&bob_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Watch history fetched successfully");
    let history = response["data"].as_array().expect("history");
    assert_eq!(history.len(), 2, "rewatch must not duplicate the entry");
    assert_eq!(id_of(&history[0]), first_id, "rewatched clip moves to the front");
    assert_eq!(id_of(&history[1]), second_id);
    assert_eq!(history[0]["views"], 2);
    assert_eq!(history[0]["owner"]["username"], "alice");
    println!("✅ Dashboard and history agree with the activity");
}
