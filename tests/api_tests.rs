use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use profiles_api::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = profiles_api::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    profiles_api::api::router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str, name: &str, password: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/profile/",
        None,
        Some(json!({ "email": email, "name": name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({ "username": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_hello_view() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/hello-view/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Hello!");
    assert_eq!(body["data"]["an_apiview"].as_array().unwrap().len(), 4);
    assert_eq!(
        body["data"]["an_apiview"][1],
        "Is similar to a traditional Django View"
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/hello-view/",
        None,
        Some(json!({ "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Hello Ada");

    for method in [Method::PUT, Method::PATCH, Method::DELETE] {
        let (status, body) = send(&app, method.clone(), "/api/hello-view/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["method"], method.as_str());
    }
}

#[tokio::test]
async fn test_hello_view_rejects_bad_names() {
    let app = spawn_app().await;

    for payload in [json!({}), json!({ "name": "" }), json!({ "name": "ElevenChars" })] {
        let (status, body) =
            send(&app, Method::POST, "/api/hello-view/", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["name"].is_array(), "missing name error: {body}");
    }
}

#[tokio::test]
async fn test_hello_viewset() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/hello-viewset/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["a_viewset"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/hello-viewset/",
        None,
        Some(json!({ "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Hello Ada!");

    for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
        let (status, body) =
            send(&app, method.clone(), "/api/hello-viewset/7/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["http_method"], method.as_str());
    }
}

#[tokio::test]
async fn test_register_hides_password_and_normalizes_email() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile/",
        None,
        Some(json!({ "email": "Ann@EXAMPLE.com", "name": "Ann", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "Ann@example.com");
    assert_eq!(body["data"]["name"], "Ann");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_reports_field_errors() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile/",
        None,
        Some(json!({ "email": "not-an-email", "name": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_duplicate_email_is_a_field_error() {
    let app = spawn_app().await;
    register(&app, "dup@example.com", "First", "pw").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile/",
        None,
        Some(json!({ "email": "dup@EXAMPLE.COM", "name": "Second", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["email"][0],
        "user profile with this email already exists."
    );
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let app = spawn_app().await;
    register(&app, "eve@example.com", "Eve", "right").await;

    let (_, wrong_password) = send(
        &app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({ "username": "eve@example.com", "password": "wrong" })),
    )
    .await;
    let (status, unknown_user) = send(
        &app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({ "username": "ghost@example.com", "password": "right" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        unknown_user["errors"]["non_field_errors"][0],
        "Unable to log in with provided credentials."
    );
}

#[tokio::test]
async fn test_login_accepts_email_alias() {
    let app = spawn_app().await;
    register(&app, "fin@example.com", "Fin", "pw").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({ "email": "fin@example.com", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/feed/", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");
}

#[tokio::test]
async fn test_profile_updates_are_owner_only() {
    let app = spawn_app().await;
    let gil = register(&app, "gil@example.com", "Gil", "pw").await;
    register(&app, "hap@example.com", "Hap", "pw").await;
    let hap_token = login(&app, "hap@example.com", "pw").await;
    let gil_token = login(&app, "gil@example.com", "pw").await;
    let uri = format!("/api/profile/{gil}/");
    let patch = json!({ "name": "Gilbert" });

    let (status, _) = send(&app, Method::PATCH, &uri, None, Some(patch.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(&hap_token), Some(patch.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(&gil_token), Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Gilbert");
    assert_eq!(body["data"]["email"], "gil@example.com");
}

#[tokio::test]
async fn test_profile_password_change_through_put() {
    let app = spawn_app().await;
    let id = register(&app, "ike@example.com", "Ike", "old").await;
    let token = login(&app, "ike@example.com", "old").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/profile/{id}/"),
        Some(&token),
        Some(json!({ "email": "ike@example.com", "name": "Ike", "password": "new" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, "ike@example.com", "new").await;
}

#[tokio::test]
async fn test_profile_search() {
    let app = spawn_app().await;
    register(&app, "jan@example.com", "Jan", "pw").await;
    register(&app, "kay@sample.org", "Kay", "pw").await;

    let (status, body) = send(&app, Method::GET, "/api/profile/?search=sample", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let profiles = body["data"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "Kay");

    let (_, body) = send(&app, Method::GET, "/api/profile/", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, "/api/profile/?search=_", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_flow() {
    let app = spawn_app().await;
    let bob = register(&app, "bob@example.com", "Bob", "pw123").await;
    let token = login(&app, "bob@example.com", "pw123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/feed/",
        None,
        Some(json!({ "status_text": "anonymous" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/feed/",
        Some(&token),
        Some(json!({ "status_text": "hello world", "user_profile": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_profile"], bob);
    assert!(body["data"]["created_on"].is_string());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/feed/?owner={bob}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status_text"], "hello world");
}

#[tokio::test]
async fn test_feed_status_length_limit() {
    let app = spawn_app().await;
    register(&app, "liz@example.com", "Liz", "pw").await;
    let token = login(&app, "liz@example.com", "pw").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/feed/",
        Some(&token),
        Some(json!({ "status_text": "x".repeat(255) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/feed/",
        Some(&token),
        Some(json!({ "status_text": "x".repeat(256) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["status_text"].is_array());
}

#[tokio::test]
async fn test_feed_writes_are_owner_only() {
    let app = spawn_app().await;
    register(&app, "max@example.com", "Max", "pw").await;
    register(&app, "ned@example.com", "Ned", "pw").await;
    let max_token = login(&app, "max@example.com", "pw").await;
    let ned_token = login(&app, "ned@example.com", "pw").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/feed/",
        Some(&max_token),
        Some(json!({ "status_text": "mine" })),
    )
    .await;
    let uri = format!("/api/feed/{}/", body["data"]["id"]);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&ned_token),
        Some(json!({ "status_text": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&ned_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&max_token),
        Some(json!({ "status_text": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status_text"], "edited");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&max_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_profile_removes_feed_and_token() {
    let app = spawn_app().await;
    let id = register(&app, "oli@example.com", "Oli", "pw").await;
    let token = login(&app, "oli@example.com", "pw").await;

    send(
        &app,
        Method::POST,
        "/api/feed/",
        Some(&token),
        Some(json!({ "status_text": "soon gone" })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/profile/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/feed/", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::GET, "/api/feed/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = spawn_app().await;
    register(&app, "pat@example.com", "Pat", "pw").await;
    let token = login(&app, "pat@example.com", "pw").await;

    let (status, _) = send(&app, Method::POST, "/api/logout/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::POST, "/api/logout/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_disabled_metrics() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = spawn_app().await;

    let (status, _) = send(&app, Method::GET, "/api/profile/42/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/feed/0/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_password_is_rejected_on_every_write() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile/",
        None,
        Some(json!({ "email": "quin@example.com", "name": "Quin", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["password"][0], "This field may not be blank.");

    let id = register(&app, "quin@example.com", "Quin", "pw").await;
    let token = login(&app, "quin@example.com", "pw").await;
    let uri = format!("/api/profile/{id}/");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "email": "quin@example.com", "name": "Quin", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["password"].is_array());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({ "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["password"].is_array());

    login(&app, "quin@example.com", "pw").await;
}

#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_request_span_records_authenticated_user() {
    let app = spawn_app().await;
    let id = register(&app, "rae@example.com", "Rae", "pw").await;
    let token = login(&app, "rae@example.com", "pw").await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    // DEBUG so the trace layer's own span is live around the request span
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    let (status, _) = send(&app, Method::GET, "/api/feed/", Some(&token), None).await;
    drop(guard);

    assert_eq!(status, StatusCode::OK);
    let output = logs.contents();
    let expected = format!("user_id={id}");
    assert!(
        output
            .lines()
            .any(|line| line.contains("Request finished") && line.contains(&expected)),
        "user_id missing from request span:\n{output}"
    );
}
