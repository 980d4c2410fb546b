//! Cryptographic utilities for API signing

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::errors::{GatewayError, GatewayResult};

pub type HmacSha256 = Hmac<Sha256>;
pub type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA256 keyed hash 생성
pub fn hmac_sha256_keyed(secret: &str) -> GatewayResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| GatewayError::InvalidSignature {
        message: format!("HMAC-SHA256 key: {e}"),
    })
}

/// HMAC-SHA512 keyed hash 생성
pub fn hmac_sha512_keyed(secret: &str) -> GatewayResult<HmacSha512> {
    HmacSha512::new_from_slice(secret.as_bytes()).map_err(|e| GatewayError::InvalidSignature {
        message: format!("HMAC-SHA512 key: {e}"),
    })
}

/// 미리 키가 설정된 MAC으로 메시지 서명
pub fn mac_bytes<M: Mac + Clone>(keyed: &M, message: &[u8]) -> Vec<u8> {
    let mut mac = keyed.clone();
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// HMAC-SHA256 서명을 hex 문자열로 반환
pub fn hmac_sha256_hex(secret: &str, message: &str) -> GatewayResult<String> {
    Ok(hex::encode(mac_bytes(&hmac_sha256_keyed(secret)?, message.as_bytes())))
}

/// Base64 인코딩
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Base64 디코딩
pub fn base64_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(data)
}
