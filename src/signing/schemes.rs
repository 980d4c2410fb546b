//! The five signing schemes.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{HeaderNames, RequestSpec, SignedRequest};
use crate::errors::{GatewayError, GatewayResult};
use crate::utils::crypto::{base64_encode, mac_bytes, HmacSha256, HmacSha512};

/// `k=v&k=v` with URL-encoded values, in the given order.
pub fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn body_string(request: &RequestSpec) -> GatewayResult<Option<String>> {
    Ok(request.body.as_ref().map(serde_json::to_string).transpose()?)
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn hex_sign256(keyed: &HmacSha256, message: &str) -> String {
    hex::encode(mac_bytes(keyed, message.as_bytes()))
}

fn b64_sign256(keyed: &HmacSha256, message: &str) -> String {
    base64_encode(&mac_bytes(keyed, message.as_bytes()))
}

/// Bybit style.
pub(super) fn concatenated_timestamp(
    keyed: &HmacSha256,
    names: &HeaderNames,
    api_key: &str,
    recv_window_ms: u64,
    request: &RequestSpec,
    timestamp: i64,
) -> GatewayResult<SignedRequest> {
    let query = encode_params(&request.params);
    let body = body_string(request)?;
    let payload = match &body {
        Some(body) => body.as_str(),
        None => query.as_str(),
    };

    let recv_window = recv_window_ms.to_string();
    let timestamp = timestamp.to_string();
    let signature = hex_sign256(keyed, &format!("{timestamp}{api_key}{recv_window}{payload}"));

    let mut headers = HashMap::new();
    headers.insert(names.api_key.clone(), api_key.to_string());
    headers.insert(names.signature.clone(), signature);
    headers.insert(names.timestamp.clone(), timestamp);
    headers.insert(names.recv_window.clone(), recv_window);

    Ok(SignedRequest {
        method: request.method,
        path: request.path.clone(),
        query,
        headers,
        body,
    })
}

/// Binance style. Body fields are folded into the form so the signature covers them.
pub(super) fn sorted_form(
    keyed: &HmacSha256,
    names: &HeaderNames,
    api_key: &str,
    request: &RequestSpec,
    timestamp: i64,
) -> GatewayResult<SignedRequest> {
    let mut params = request.params.clone();
    match &request.body {
        Some(Value::Object(map)) => {
            params.extend(map.iter().map(|(k, v)| (k.clone(), scalar_string(v))));
        },
        Some(Value::Null) | None => {},
        Some(_) => {
            return Err(GatewayError::InvalidSignature {
                message: "sorted form signing needs an object body".into(),
            })
        },
    }
    params.push(("timestamp".into(), timestamp.to_string()));
    params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let form = encode_params(&params);
    let signature = hex_sign256(keyed, &form);

    let mut headers = HashMap::new();
    headers.insert(names.api_key.clone(), api_key.to_string());

    Ok(SignedRequest {
        method: request.method,
        path: request.path.clone(),
        query: format!("{form}&signature={signature}"),
        headers,
        body: None,
    })
}

/// KuCoin style.
pub(super) fn passphrase_double_hash(
    keyed: &HmacSha256,
    names: &HeaderNames,
    api_key: &str,
    passphrase: &str,
    key_version: u8,
    request: &RequestSpec,
    timestamp: i64,
) -> GatewayResult<SignedRequest> {
    let query = encode_params(&request.params);
    let body = body_string(request)?;
    let endpoint = if query.is_empty() {
        request.path.clone()
    } else {
        format!("{}?{}", request.path, query)
    };

    let timestamp = timestamp.to_string();
    let prehash = format!(
        "{}{}{}{}",
        timestamp,
        request.method.as_str(),
        endpoint,
        body.as_deref().unwrap_or_default()
    );
    let signature = b64_sign256(keyed, &prehash);
    let signed_passphrase = b64_sign256(keyed, passphrase);

    let mut headers = HashMap::new();
    headers.insert(names.api_key.clone(), api_key.to_string());
    headers.insert(names.signature.clone(), signature);
    headers.insert(names.timestamp.clone(), timestamp);
    headers.insert(names.passphrase.clone(), signed_passphrase);
    headers.insert(names.key_version.clone(), key_version.to_string());

    Ok(SignedRequest {
        method: request.method,
        path: request.path.clone(),
        query,
        headers,
        body,
    })
}

/// Coinone style. The JSON map keeps keys sorted, so the payload is canonical.
pub(super) fn nonce_payload(
    keyed: &HmacSha512,
    names: &HeaderNames,
    api_key: &str,
    request: &RequestSpec,
    nonce: Uuid,
) -> GatewayResult<SignedRequest> {
    let mut map = match &request.body {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            return Err(GatewayError::InvalidSignature {
                message: "nonce payload signing needs an object body".into(),
            })
        },
    };
    for (k, v) in &request.params {
        map.entry(k.clone()).or_insert_with(|| Value::String(v.clone()));
    }
    map.insert("access_token".into(), Value::String(api_key.to_string()));
    map.insert("nonce".into(), Value::String(nonce.to_string()));

    let json = serde_json::to_string(&Value::Object(map))?;
    let payload = base64_encode(json.as_bytes());
    let signature = hex::encode(mac_bytes(keyed, payload.as_bytes()));

    let mut headers = HashMap::new();
    headers.insert(names.payload.clone(), payload);
    headers.insert(names.signature.clone(), signature);

    Ok(SignedRequest {
        method: request.method,
        path: request.path.clone(),
        query: String::new(),
        headers,
        body: Some(json),
    })
}

/// MEXC style. The parameter string keeps caller order; only `timestamp` is appended.
pub(super) fn plain_query(
    keyed: &HmacSha256,
    names: &HeaderNames,
    api_key: &str,
    request: &RequestSpec,
    timestamp: i64,
) -> GatewayResult<SignedRequest> {
    let mut params = request.params.clone();
    if let Some(Value::Object(map)) = &request.body {
        params.extend(map.iter().map(|(k, v)| (k.clone(), scalar_string(v))));
    }
    params.push(("timestamp".into(), timestamp.to_string()));

    let query = encode_params(&params);
    let signature = hex_sign256(keyed, &query);

    let mut headers = HashMap::new();
    headers.insert(names.api_key.clone(), api_key.to_string());

    Ok(SignedRequest {
        method: request.method,
        path: request.path.clone(),
        query: format!("{query}&signature={signature}"),
        headers,
        body: None,
    })
}
