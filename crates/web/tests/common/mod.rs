//! Shared harness for the HTTP flow tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, Response, StatusCode};
use bracket_core::{Database, DiskBannerStore};
use bracket_web::flash::{read_notices, Flash};
use bracket_web::{router, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "hunter2hunter2";
const BOUNDARY: &str = "bracket-test-boundary";

/// A router over an in-memory database and a scratch upload folder
pub struct TestApp {
    pub state: AppState,
    _uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        let banners = DiskBannerStore::with_base_path(uploads.path().to_path_buf()).unwrap();
        let state = AppState::new(db, banners, Config::default());
        Self {
            state,
            _uploads: uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        router(self.state.clone()).oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        session: Option<&str>,
        referer: Option<&str>,
    ) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(r) = referer {
            builder = builder.header(header::REFERER, r);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        banner: Option<(&str, &[u8])>,
        session: Option<&str>,
    ) -> Response<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = banner {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"banner_upload\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn register(&self, username: &str) -> Response<Body> {
        let email = format!("{username}@example.com");
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("email", email.as_str()),
                ("password", PASSWORD),
                ("confirm_password", PASSWORD),
            ],
            None,
            None,
        )
        .await
    }

    /// Log in and return the `Cookie` header value for the new session
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form(
                "/login",
                &[("username", username), ("password", PASSWORD)],
                None,
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        set_cookies(&response)
            .into_iter()
            .find(|c| c.starts_with("bracket_session="))
            .expect("login sets a session cookie")
    }

    /// Register then log in
    pub async fn sign_up(&self, username: &str) -> String {
        let response = self.register(username).await;
        assert_eq!(location(&response), "/login");
        self.login(username).await
    }

    pub async fn create_event(&self, session: &str, title: &str) -> Uuid {
        let response = self
            .post_multipart("/create", &event_fields(title), None, Some(session))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);
        let id = target
            .strip_prefix("/events/")
            .expect("create redirects to the event page");
        Uuid::parse_str(id).unwrap()
    }

    pub async fn event_json(&self, id: Uuid, session: Option<&str>) -> Value {
        let response = self.get(&format!("/events/{id}"), session).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }
}

pub fn event_fields(title: &str) -> Vec<(&str, &str)> {
    vec![
        ("title", title),
        ("category", "Amateur"),
        ("region", "OCE"),
        ("date", "2025-06-01"),
        ("time", "18:00"),
        ("team_size", "Duo"),
        ("mode", "Battle Royale"),
        ("prize", "$100"),
        ("description", "Weekly duo cup"),
    ]
}

pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` pairs from every Set-Cookie header
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::to_string)
        .collect()
}

/// Notices a redirect carries to the next page
pub fn notices(response: &Response<Body>) -> Vec<Flash> {
    let mut headers = HeaderMap::new();
    let cookies = set_cookies(response).join("; ");
    headers.insert(header::COOKIE, HeaderValue::from_str(&cookies).unwrap());
    read_notices(&headers)
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
