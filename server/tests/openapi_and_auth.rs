//! Router tests that never reach the database.

mod common;

use axum::http::{Method, StatusCode};
use common::{offline_app, send};

#[tokio::test]
async fn test_protected_endpoints_require_token() {
    let app = offline_app();

    let cases = [
        (Method::GET, "/api/users/me/"),
        (Method::POST, "/api/users/set_password/"),
        (Method::GET, "/api/users/subscriptions/"),
        (Method::POST, "/api/users/1/subscribe/"),
        (Method::DELETE, "/api/users/1/subscribe/"),
        (Method::POST, "/api/auth/token/logout/"),
        (Method::POST, "/api/recipes/"),
        (Method::PATCH, "/api/recipes/1/"),
        (Method::DELETE, "/api/recipes/1/"),
        (Method::POST, "/api/recipes/1/favorite/"),
        (Method::DELETE, "/api/recipes/1/shopping_cart/"),
        (Method::GET, "/api/recipes/download_shopping_cart/"),
        (Method::POST, "/api/ingredients/"),
    ];

    for (method, uri) in cases {
        let response = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(
            response.status,
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require authentication"
        );
        assert_eq!(
            response.json()["detail"],
            "Authentication credentials were not provided."
        );
    }
}

#[tokio::test]
async fn test_malformed_token_header_is_rejected() {
    let app = offline_app();
    let request = axum::http::Request::builder()
        .uri("/api/recipes/")
        .header("Authorization", "Bearer abc123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = send(&offline_app(), Method::GET, "/api/nothing-here/", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[test]
fn test_openapi_lists_every_route() {
    let spec = foodgram_server::api::openapi();
    let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();

    for expected in [
        "/api/auth/token/login/",
        "/api/auth/token/logout/",
        "/api/users/",
        "/api/users/me/",
        "/api/users/set_password/",
        "/api/users/subscriptions/",
        "/api/users/{id}/",
        "/api/users/{id}/subscribe/",
        "/api/tags/",
        "/api/tags/{id}/",
        "/api/ingredients/",
        "/api/ingredients/{id}/",
        "/api/recipes/",
        "/api/recipes/{id}/",
        "/api/recipes/{id}/favorite/",
        "/api/recipes/{id}/shopping_cart/",
        "/api/recipes/download_shopping_cart/",
        "/api/media/{id}",
    ] {
        assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
    }
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = send(&offline_app(), Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let doc = response.json();
    assert_eq!(doc["info"]["title"], "Foodgram API");
    assert!(doc["components"]["securitySchemes"]["token_auth"].is_object());
}

#[tokio::test]
async fn test_huge_page_number_is_invalid_page() {
    let app = offline_app();

    for uri in [
        "/api/recipes/?page=9223372036854775807",
        "/api/users/?page=9223372036854775807&limit=100",
    ] {
        let response = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.json()["detail"], "Invalid page.");
    }
}
