//! Shared helpers for driving the router in-process.
//!
//! Database-backed tests run only when `TEST_DATABASE_URL` points at a
//! scratch Postgres database; otherwise they return early. Set
//! `INSECURE_PASSWORD_HASHING=1` to keep registration fast.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use base64::Engine;
use diesel::prelude::*;
use foodgram_server::config::Config;
use foodgram_server::db::{self, DbConn, DbPool};
use foodgram_server::models::{NewIngredient, NewTag};
use foodgram_server::schema::{ingredients, tags};
use foodgram_server::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::LazyLock;
use tower::ServiceExt;

const UNREACHABLE_DATABASE: &str = "postgres://foodgram@127.0.0.1:1/foodgram";

static POOL: LazyLock<Option<DbPool>> = LazyLock::new(|| {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    Some(db::create_pool(&url).expect("Failed to set up test database"))
});

/// Router whose pool never connects. Only routes that reject a request
/// before touching the database can be exercised with it.
pub fn offline_app() -> Router {
    build_router(AppState::new(
        db::lazy_pool(UNREACHABLE_DATABASE),
        Config::with_database_url(UNREACHABLE_DATABASE),
    ))
}

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Response is not JSON ({e}): {:?}", self.body))
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("Response is not UTF-8")
    }
}

/// Short random suffix keeping names unique across tests and runs.
pub fn unique() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// A small PNG and the data URI that carries it.
pub fn png_data_uri() -> (String, Vec<u8>) {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 80, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    (format!("data:image/png;base64,{encoded}"), bytes)
}

impl TestApp {
    pub fn connect() -> Option<Self> {
        let pool = POOL.as_ref()?.clone();
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(Self {
            router: build_router(AppState::new(pool.clone(), Config::with_database_url(url))),
            pool,
        })
    }

    pub fn conn(&self) -> DbConn {
        self.pool.get().unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        send(&self.router, method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Option<Value>) -> Response {
        self.send(Method::POST, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Register a fresh user and log in. Returns the user id and token.
    pub async fn register(&self, label: &str) -> (i64, String) {
        let suffix = unique();
        let email = format!("{label}-{suffix}@example.com");
        let password = "correct-horse-battery";

        let created = self
            .send(
                Method::POST,
                "/api/users/",
                None,
                Some(json!({
                    "email": email,
                    "username": format!("{label}_{suffix}"),
                    "first_name": "Test",
                    "last_name": label,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text());
        let id = created.json()["id"].as_i64().unwrap();

        let login = self
            .send(
                Method::POST,
                "/api/auth/token/login/",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text());
        let token = login.json()["auth_token"].as_str().unwrap().to_string();

        (id, token)
    }

    pub fn seed_tag(&self) -> i32 {
        self.seed_tag_with_slug().0
    }

    pub fn seed_tag_with_slug(&self) -> (i32, String) {
        let suffix = unique();
        let slug = format!("tag-{suffix}");
        let color = format!("#{}", &suffix[..6]);
        let id: i32 = diesel::insert_into(tags::table)
            .values(NewTag {
                name: &slug,
                color: &color,
                slug: &slug,
            })
            .returning(tags::id)
            .get_result(&mut self.conn())
            .unwrap();
        (id, slug)
    }

    pub fn seed_ingredient(&self, name: &str, measurement_unit: &str) -> i32 {
        diesel::insert_into(ingredients::table)
            .values(NewIngredient {
                name,
                measurement_unit,
            })
            .returning(ingredients::id)
            .get_result(&mut self.conn())
            .unwrap()
    }

    /// Create a recipe through the API and return its JSON representation.
    pub async fn create_recipe(&self, token: &str, tag: i32, ingredients: &[(i32, i32)]) -> Value {
        let (image, _) = png_data_uri();
        let ingredients: Vec<Value> = ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect();

        let response = self
            .post(
                "/api/recipes/",
                token,
                Some(json!({
                    "ingredients": ingredients,
                    "tags": [tag],
                    "image": image,
                    "name": format!("Recipe {}", unique()),
                    "text": "Mix and bake.",
                    "cooking_time": 15,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }
}

/// A `multipart/form-data` part: field name, optional file name, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content: &'a [u8],
}

impl TestApp {
    pub async fn post_multipart(&self, uri: &str, token: &str, parts: &[Part<'_>]) -> Response {
        const BOUNDARY: &str = "foodgram-test-boundary";

        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match part.file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    part.name, file_name
                ),
                None => format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                ),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(part.content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        into_response(self.router.clone().oneshot(request).await.unwrap()).await
    }
}

async fn into_response(response: axum::response::Response) -> Response {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    Response {
        status,
        headers,
        body,
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_response(router.clone().oneshot(request).await.unwrap()).await
}
