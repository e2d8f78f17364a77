use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature is empty")]
    Missing,

    #[error("signature is not valid hex")]
    Malformed,

    #[error("invalid signing key")]
    InvalidKey,

    #[error("signature does not match payload")]
    Mismatch,
}

/// Computes the checkout signature the gateway attaches to a successful payment:
/// hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}")).
pub fn sign(key_secret: &str, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
    let mac = keyed(key_secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a checkout callback signature in constant time.
pub fn verify(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(SignatureError::Missing);
    }

    let expected = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;

    keyed(key_secret, order_id, payment_id)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

fn keyed(key_secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(key_secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}
