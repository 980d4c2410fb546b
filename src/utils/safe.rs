//! Safe helper functions for extracting values from JSON
//!
//! 거래소 응답 JSON에서 타입 변환 실패 없이 값을 꺼내는 헬퍼들.
//! Numeric fields may arrive as JSON numbers, plain strings or scientific-notation strings.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// 문자열을 Decimal로 변환 (과학적 표기법 포함)
///
/// Accepts `"123.45"`, `"0"`, `"8.9e-7"` and `"1E+3"`. Empty or malformed input yields `None`.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.contains(['e', 'E']) {
        return Decimal::from_scientific(cleaned).ok();
    }
    Decimal::from_str(cleaned).ok()
}

/// 안전한 문자열 추출
pub fn safe_string(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// 두 키 중 하나에서 문자열 추출
pub fn safe_string2(obj: &Value, key1: &str, key2: &str) -> Option<String> {
    safe_string(obj, key1).or_else(|| safe_string(obj, key2))
}

/// N개 키 중 하나에서 문자열 추출
pub fn safe_string_n(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| safe_string(obj, k))
}

/// 대문자 문자열 추출
pub fn safe_string_upper(obj: &Value, key: &str) -> Option<String> {
    safe_string(obj, key).map(|s| s.to_uppercase())
}

/// 안전한 정수 추출
pub fn safe_integer(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// N개 키 중 하나에서 정수 추출
pub fn safe_integer_n(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| safe_integer(obj, k))
}

/// 안전한 Decimal 추출
pub fn safe_decimal(obj: &Value, key: &str) -> Option<Decimal> {
    obj.get(key).and_then(decimal_of)
}

/// 두 키 중 하나에서 Decimal 추출
pub fn safe_decimal2(obj: &Value, key1: &str, key2: &str) -> Option<Decimal> {
    safe_decimal(obj, key1).or_else(|| safe_decimal(obj, key2))
}

/// N개 키 중 하나에서 Decimal 추출
pub fn safe_decimal_n(obj: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| safe_decimal(obj, k))
}

/// JSON 노드 자체를 Decimal로 변환
pub fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}

/// 안전한 타임스탬프 추출 (밀리초)
pub fn safe_timestamp(obj: &Value, key: &str) -> Option<i64> {
    safe_integer(obj, key).or_else(|| {
        safe_string(obj, key).and_then(|s| {
            // ISO 8601 파싱 시도
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.timestamp_millis())
                .ok()
        })
    })
}

/// N개 키 중 하나에서 타임스탬프 추출
pub fn safe_timestamp_n(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| safe_timestamp(obj, k))
}

/// 안전한 값 추출
pub fn safe_value<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// 안전한 불린 추출
pub fn safe_bool(obj: &Value, key: &str) -> Option<bool> {
    obj.get(key).and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    })
}

/// N개 키 중 하나에서 불린 추출
pub fn safe_bool_n(obj: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| safe_bool(obj, k))
}

/// 기본값을 가진 안전한 문자열 추출
pub fn safe_string_or(obj: &Value, key: &str, default: &str) -> String {
    safe_string(obj, key).unwrap_or_else(|| default.to_string())
}

/// 기본값을 가진 안전한 정수 추출
pub fn safe_integer_or(obj: &Value, key: &str, default: i64) -> i64 {
    safe_integer(obj, key).unwrap_or(default)
}

/// 기본값을 가진 안전한 Decimal 추출
pub fn safe_decimal_or(obj: &Value, key: &str, default: Decimal) -> Decimal {
    safe_decimal(obj, key).unwrap_or(default)
}

/// 기본값을 가진 안전한 불린 추출
pub fn safe_bool_or(obj: &Value, key: &str, default: bool) -> bool {
    safe_bool(obj, key).unwrap_or(default)
}
