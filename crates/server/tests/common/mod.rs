#![allow(dead_code)]

use assistant::{Assistant, AssistantError};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::Response,
};
use database::{
    db::connect,
    entities::users,
    services::user::{Identity, UserService},
};
use migration::{Migrator, MigratorTrait};
use models::enums::UserRole;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use serde_json::Value;
use server::{app::app, auth::AccessClaims, state::AppState};
use std::sync::Arc;
use tower::ServiceExt;

/// Header the test middleware turns into token claims
pub const SUBJECT_HEADER: &str = "x-test-subject";

/// Replies with the same text to every prompt
pub struct Canned(pub &'static str);

#[async_trait]
impl Assistant for Canned {
    async fn complete(&self, _prompt: &str) -> Result<String, AssistantError> {
        Ok(self.0.to_string())
    }
}

async fn claims_from_header(mut request: Request, next: Next) -> Response {
    let subject = request
        .headers()
        .get(SUBJECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(subject) = subject {
        request.extensions_mut().insert(AccessClaims {
            email: Some(format!("{subject}@college.edu")),
            name: Some(subject.clone()),
            sub: Some(subject),
        });
    }

    next.run(request).await
}

pub struct TestApp {
    pub db: DatabaseConnection,
    router: Router,
}

impl TestApp {
    pub async fn new(assistant: impl Assistant + 'static) -> Self {
        let db = connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let router = app(AppState::new(db.clone(), Arc::new(assistant)), |router| {
            router.layer(middleware::from_fn(claims_from_header))
        });

        Self { db, router }
    }

    /// Provisions a user for `subject` and gives it `role`
    pub async fn user(&self, subject: &str, role: UserRole) -> users::Model {
        let user = UserService::provision(
            &self.db,
            Identity {
                external_id: subject.to_string(),
                email: None,
                name: Some(subject.to_string()),
            },
        )
        .await
        .unwrap();

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role);
        active.update(&self.db).await.unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        subject: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(subject) = subject {
            builder = builder.header(SUBJECT_HEADER, subject);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, subject: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(subject), None).await
    }

    pub async fn post(&self, uri: &str, subject: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(subject), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, subject: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(subject), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, subject: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(subject), None).await
    }

    /// Creates a resource as `admin` and returns its id
    pub async fn create(&self, uri: &str, admin: &str, body: Value) -> String {
        let (status, value) = self.post(uri, admin, body).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}: {value}");
        value["id"].as_str().unwrap().to_string()
    }
}
