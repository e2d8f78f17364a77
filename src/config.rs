use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub razorpay: RazorpayConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR", "0.0.0.0:3000"),
            database_url: optional("DATABASE_URL", "sqlite::memory:"),
            jwt_secret: required("JWT_SECRET")?,
            razorpay: RazorpayConfig {
                key_id: required("RAZORPAY_KEY_ID")?,
                key_secret: required("RAZORPAY_KEY_SECRET")?,
                base_url: optional("RAZORPAY_BASE_URL", "https://api.razorpay.com"),
                currency: optional("PAYMENT_CURRENCY", "INR"),
            },
            smtp: SmtpConfig {
                host: required("SMTP_HOST")?,
                username: required("SMTP_USER")?,
                password: required("SMTP_PASS")?,
                from: required("MAIL_FROM")?,
            },
        })
    }
}
