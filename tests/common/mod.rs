#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use coursepay::api::auth::issue_token;
use coursepay::api::server::{build_router, connect_db, AppState};
use coursepay::db::models::{Course, User};
use coursepay::db::repo;
use coursepay::mail::{Email, MailError, Mailer};
use coursepay::payments::{GatewayError, Order, OrderRequest, PaymentGateway};

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const KEY_SECRET: &str = "rzp_test_key_secret";

#[derive(Default)]
pub struct FakeGateway {
    pub requests: Mutex<Vec<OrderRequest>>,
    pub fail: bool,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError> {
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 500,
                message: "gateway down".to_string(),
            });
        }

        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());

        Ok(Order {
            id: format!("order_test_{}", requests.len()),
            entity: "order".to_string(),
            amount: request.amount,
            amount_paid: 0,
            amount_due: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: "created".to_string(),
            attempts: 0,
            created_at: 1_700_000_000,
        })
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<Email>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        if self.fail {
            let err = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(err));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub gateway: Arc<FakeGateway>,
    pub mailer: Arc<FakeMailer>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with(FakeGateway::default(), FakeMailer::default()).await
    }

    pub async fn with(gateway: FakeGateway, mailer: FakeMailer) -> Self {
        let gateway = Arc::new(gateway);
        let mailer = Arc::new(mailer);
        let state = Arc::new(AppState {
            db: connect_db("sqlite::memory:").await.unwrap(),
            jwt_secret: JWT_SECRET.to_string(),
            key_secret: KEY_SECRET.to_string(),
            currency: "INR".to_string(),
            gateway: gateway.clone(),
            mailer: mailer.clone(),
        });

        Self {
            state,
            gateway,
            mailer,
        }
    }

    pub fn db(&self) -> &SqlitePool {
        &self.state.db
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let body = serde_json::to_string(&body).unwrap();
        self.post_raw(uri, token, Some("application/json"), &body).await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let response = self
            .router()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub fn gateway_calls(&self) -> usize {
        self.gateway.requests.lock().unwrap().len()
    }

    pub fn sent_mail(&self) -> Vec<Email> {
        self.mailer.sent.lock().unwrap().clone()
    }
}

pub fn token_for(user_id: &str) -> String {
    issue_token(JWT_SECRET, user_id, "student@example.com", 600).unwrap()
}

pub async fn seed_course(pool: &SqlitePool, id: &str, name: &str, price: i64) {
    let mut conn = pool.acquire().await.unwrap();
    repo::insert_course(
        &mut conn,
        &Course {
            id: id.to_string(),
            name: name.to_string(),
            price,
            students_enrolled: Vec::new(),
        },
    )
    .await
    .unwrap();
}

pub async fn seed_user(pool: &SqlitePool, id: &str, email: &str) {
    let mut conn = pool.acquire().await.unwrap();
    repo::insert_user(
        &mut conn,
        &User {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            courses: Vec::new(),
            course_progress: Vec::new(),
        },
    )
    .await
    .unwrap();
}

pub async fn find_course(pool: &SqlitePool, id: &str) -> Course {
    let mut conn = pool.acquire().await.unwrap();
    repo::find_course(&mut conn, id).await.unwrap().unwrap()
}

pub async fn find_user(pool: &SqlitePool, id: &str) -> User {
    let mut conn = pool.acquire().await.unwrap();
    repo::find_user(&mut conn, id).await.unwrap().unwrap()
}

pub async fn progress_count(pool: &SqlitePool, course_id: &str, user_id: &str) -> usize {
    let mut conn = pool.acquire().await.unwrap();
    repo::list_progress(&mut conn, course_id, user_id)
        .await
        .unwrap()
        .len()
}
