pub mod gateway;
pub mod signature;

pub use gateway::{GatewayError, Order, OrderRequest, PaymentGateway, RazorpayClient};
pub use signature::SignatureError;
