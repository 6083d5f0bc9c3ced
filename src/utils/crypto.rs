//! Cryptographic utilities for API signing

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{CcxtError, CcxtResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 서명 생성
pub fn hmac_sha256(secret: &str, message: &str) -> CcxtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        CcxtError::AuthenticationError {
            message: "Invalid secret key".into(),
        }
    })?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256 서명을 base64 문자열로 반환
pub fn hmac_sha256_base64(secret: &str, message: &str) -> CcxtResult<String> {
    Ok(base64_encode(&hmac_sha256(secret, message)?))
}

/// Base64 인코딩
pub fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}
