//! In-process harness: the full router over in-memory stores, driven with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use api::{ApiConfig, build_app};
use auth::{AuthConfig, InMemoryAuthRepository};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use blog::InMemoryBlogRepository;
use platform::mail::Mailer;
use serde_json::{Value, json};
use tower::ServiceExt;

/// `admin:qwerty`
pub const ADMIN_BASIC: &str = "Basic YWRtaW46cXdlcnR5";
pub const PASSWORD: &str = "qwerty1";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryAuthRepository>,
    pub blogs: Arc<InMemoryBlogRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `refreshToken=...` pair from `Set-Cookie`, ready for a `Cookie` header
    pub fn refresh_cookie(&self) -> String {
        let set_cookie = self
            .headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        set_cookie.split(';').next().unwrap_or_default().to_string()
    }

    /// Field names of a `400` body
    pub fn error_fields(&self) -> Vec<String> {
        self.body["errorsMessages"]
            .as_array()
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub struct Call {
    method: Method,
    uri: String,
    headers: Vec<(header::HeaderName, String)>,
    body: Option<Value>,
}

pub fn call(method: Method, uri: &str) -> Call {
    Call {
        method,
        uri: uri.to_string(),
        headers: Vec::new(),
        body: None,
    }
}

impl Call {
    pub fn admin(self) -> Self {
        self.header(header::AUTHORIZATION, ADMIN_BASIC.to_string())
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION, format!("Bearer {}", token))
    }

    pub fn cookie(self, cookie: &str) -> Self {
        self.header(header::COOKIE, cookie.to_string())
    }

    pub fn from_ip(self, ip: &str) -> Self {
        self.header(header::HeaderName::from_static("x-forwarded-for"), ip.to_string())
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn header(mut self, name: header::HeaderName, value: String) -> Self {
        self.headers.push((name, value));
        self
    }
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryAuthRepository::new());
        let blogs = Arc::new(InMemoryBlogRepository::new());
        let config = ApiConfig {
            auth: AuthConfig::development(),
            ..ApiConfig::default()
        };
        let router = build_app(
            &config,
            users.clone(),
            blogs.clone(),
            Arc::new(Mailer::Disabled),
        );
        Self {
            router,
            users,
            blogs,
        }
    }

    pub async fn send(&self, call: Call) -> TestResponse {
        let mut builder = Request::builder().method(call.method).uri(call.uri);
        for (name, value) in call.headers {
            builder = builder.header(name, value);
        }
        let request = match call.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn create_blog(&self, name: &str) -> Value {
        let response = self
            .send(call(Method::POST, "/blogs").admin().json(json!({
                "name": name,
                "description": "A blog about things",
                "websiteUrl": "https://example.com/blog"
            })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body
    }

    pub async fn create_post(&self, blog_id: &str, title: &str) -> Value {
        let response = self
            .send(
                call(Method::POST, &format!("/blogs/{}/posts", blog_id))
                    .admin()
                    .json(json!({
                        "title": title,
                        "shortDescription": "Short description",
                        "content": "Post content"
                    })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body
    }

    /// Administrator-created (already confirmed) user
    pub async fn create_user(&self, login: &str) -> Value {
        let response = self
            .send(call(Method::POST, "/users").admin().json(json!({
                "login": login,
                "password": PASSWORD,
                "email": format!("{}@example.com", login)
            })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body
    }

    pub async fn login(&self, login: &str) -> TestResponse {
        let response = self
            .send(call(Method::POST, "/auth/login").json(json!({
                "loginOrEmail": login,
                "password": PASSWORD
            })))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response
    }

    /// Creates the user and returns its access token
    pub async fn user_token(&self, login: &str) -> String {
        self.create_user(login).await;
        let response = self.login(login).await;
        response.body["accessToken"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}
