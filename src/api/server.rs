use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::payments;
use crate::config::Config;
use crate::db::repo;
use crate::mail::{MailError, Mailer, SmtpMailer};
use crate::payments::{GatewayError, PaymentGateway, RazorpayClient};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("payment gateway: {0}")]
    Gateway(#[from] GatewayError),

    #[error("mailer: {0}")]
    Mail(#[from] MailError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub key_secret: String,
    pub currency: String,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/payment/capturePayment", post(payments::capture_payment))
        .route("/api/v1/payment/verifyPayment", post(payments::verify_payment))
        .route(
            "/api/v1/payment/sendPaymentSuccessEmail",
            post(payments::send_payment_success_email),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

pub async fn connect_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Writers queue on the database lock instead of failing with SQLITE_BUSY.
    let connect = SqliteConnectOptions::from_str(db_url)?.busy_timeout(Duration::from_secs(5));

    let options = if db_url.contains(":memory:") {
        // Every connection to an in-memory database sees its own empty schema,
        // so keep exactly one alive for the life of the pool.
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = options.connect_with(connect).await?;

    repo::create_tables(&pool).await?;
    Ok(pool)
}

pub async fn start_server(config: Config) -> Result<(), StartupError> {
    let pool = connect_db(&config.database_url).await?;

    let state = Arc::new(AppState {
        db: pool,
        jwt_secret: config.jwt_secret.clone(),
        key_secret: config.razorpay.key_secret.clone(),
        currency: config.razorpay.currency.clone(),
        gateway: Arc::new(RazorpayClient::new(&config.razorpay)?),
        mailer: Arc::new(SmtpMailer::new(&config.smtp)?),
    });

    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
