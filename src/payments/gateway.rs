use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RazorpayConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Body of an order-creation call. `amount` is in the currency's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

/// Order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: u64,
    #[serde(default)]
    pub amount_paid: u64,
    #[serde(default)]
    pub amount_due: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created_at: i64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    description: String,
}

/// REST client for Razorpay's Orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error.description)
                .unwrap_or_else(|_| status.to_string());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Order>().await?)
    }
}
