use axum::body::Body;
use axum::http::{Method, Request};
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers;

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> StatusCode {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
        .unwrap();
    app.oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn healthz_is_ok() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(app, Method::GET, "/healthz", None).await, StatusCode::OK);
}

#[tokio::test]
async fn api_routes_require_a_session_cookie() {
    let cases = [
        (Method::GET, "/api/auth/me", None),
        (Method::POST, "/api/auth/logout", None),
        (Method::GET, "/api/leads", None),
        (Method::GET, "/api/leads?offset=50&status=new", None),
        (Method::POST, "/api/leads", Some(r#"{"name":"Ada","email":"ada@example.com"}"#)),
        (Method::GET, "/api/campaigns", None),
        (Method::GET, "/api/campaigns/stats", None),
        (Method::POST, "/api/campaigns", Some(r#"{"name":"Q3"}"#)),
        (Method::PUT, "/api/campaigns/00000000-0000-0000-0000-000000000001/leads", Some(r#"{"lead_ids":[]}"#)),
        (Method::GET, "/api/analytics", None),
        (Method::GET, "/api/dashboard", None),
        (Method::GET, "/api/profile", None),
        (Method::PUT, "/api/profile/notifications", Some("{}")),
    ];

    for (method, uri, body) in cases {
        let app = app(test_helpers::test_app_state());
        let status = send(app, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn empty_session_cookie_is_rejected() {
    let app = app(test_helpers::test_app_state());
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("cookie", "session_token=")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dev_session_is_hidden_unless_enabled() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(app, Method::POST, "/api/dev/session", None).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(app, Method::GET, "/api/boards", None).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(app, Method::DELETE, "/api/leads", None).await, StatusCode::METHOD_NOT_ALLOWED);
}
