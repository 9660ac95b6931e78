mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn token_list_requires_an_access_token() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/tokens")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn token_list_rejects_a_garbage_bearer_token() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/tokens")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_list_rejects_non_bearer_schemes() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/tokens")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_list_rejects_a_token_signed_with_another_secret() {
    let token = taskbook_backend::utils::jwt::create_access_token(
        7,
        "a@example.com",
        "USER",
        "some-other-secret",
        30,
    )
    .expect("create token");

    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/tokens")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_without_the_cookie_is_a_bad_request() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tokens/refresh")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
}

#[tokio::test]
async fn refresh_with_an_empty_cookie_value_is_a_bad_request() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tokens/refresh")
                .header(header::COOKIE, "refresh_token=")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_the_current_session_requires_authentication() {
    let app = support::app();
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/tokens/current")
                .header(header::COOKIE, "refresh_token=abc")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_user_and_todo_routes_require_authentication() {
    for (method, uri) in [
        ("GET", "/user"),
        ("PATCH", "/user"),
        ("PUT", "/user/password"),
        ("GET", "/todos"),
        ("POST", "/todos"),
        ("GET", "/todos/statistics"),
        ("DELETE", "/todos/some-id"),
    ] {
        let app = support::app();
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("call request");

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require auth",
            method,
            uri
        );
    }
}
