//! Jolokia JSON 응답 파서
//!
//! Jolokia `search`, `list`, `read` 응답을 내부 데이터 구조로 변환합니다.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::object_name::{ObjectName, ObjectNamePattern};
use super::value::{AttributeValue, CompositeRecord};
use super::AttributeDescriptor;
use crate::error::CollectorError;

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;

/// Declared type prefix of `CompositeData[]` attributes
const COMPOSITE_ARRAY_TYPE: &str = "[Ljavax.management.openmbean.CompositeData";

/// Jolokia API 응답 구조체
#[derive(Debug, Clone, Deserialize)]
pub struct JolokiaResponse {
    /// 요청 정보
    pub request: RequestInfo,
    /// 응답 값 (요청 타입에 따라 형태가 다름)
    #[serde(default)]
    pub value: Value,
    /// 응답 상태 코드
    pub status: u16,
    /// 타임스탬프 (Unix epoch)
    #[serde(default)]
    pub timestamp: u64,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 에러 타입 (실패 시)
    pub error_type: Option<String>,
}

/// 요청 정보
#[derive(Debug, Clone, Deserialize)]
pub struct RequestInfo {
    /// MBean ObjectName (search/read)
    #[serde(default)]
    pub mbean: Option<String>,
    /// List 경로
    #[serde(default)]
    pub path: Option<String>,
    /// 요청 타입
    #[serde(rename = "type")]
    pub request_type: String,
}

impl JolokiaResponse {
    /// 성공 응답이 아니면 에러로 변환
    pub fn into_success(self) -> CollectResult<Self> {
        if self.status != 200 {
            return Err(CollectorError::JolokiaError {
                status: self.status,
                message: self
                    .error
                    .unwrap_or_else(|| format!("{} request failed", self.request.request_type)),
            });
        }
        Ok(self)
    }
}

/// 단일 응답 파싱
pub fn parse_response(json: &str) -> CollectResult<JolokiaResponse> {
    serde_json::from_str(json).map_err(|e| CollectorError::JsonParse(e.to_string()))
}

/// Bulk 응답 파싱
pub fn parse_bulk_response(json: &str) -> CollectResult<Vec<JolokiaResponse>> {
    serde_json::from_str(json).map_err(|e| CollectorError::JsonParse(e.to_string()))
}

/// `search` 응답 값 파싱 - ObjectName 목록
///
/// Names that cannot be parsed are skipped.
pub fn parse_search_value(value: &Value) -> CollectResult<Vec<ObjectName>> {
    let names = value
        .as_array()
        .ok_or_else(|| CollectorError::JsonParse("search value is not an array".to_string()))?;

    Ok(names
        .iter()
        .filter_map(Value::as_str)
        .filter_map(parse_or_skip)
        .collect())
}

/// Parse an object name from a response, logging and skipping it on failure
fn parse_or_skip(name: &str) -> Option<ObjectName> {
    match ObjectName::parse(name) {
        Ok(object_name) => Some(object_name),
        Err(e) => {
            tracing::warn!(name = %name, error = %e, "Skipping unparsable object name");
            None
        }
    }
}

/// `list` 응답 값 파싱 - key property 문자열 → attribute descriptor 목록
///
/// Jolokia lists one entry per key property list (e.g. `type=QueryStats`),
/// each carrying an `attr` map of `{type, desc, rw}` records.
pub fn parse_list_value(
    domain: &str,
    value: &Value,
) -> CollectResult<Vec<(ObjectName, Vec<AttributeDescriptor>)>> {
    let entries = value
        .as_object()
        .ok_or_else(|| CollectorError::JsonParse("list value is not an object".to_string()))?;

    let mut result = Vec::with_capacity(entries.len());
    for (key_properties, info) in entries {
        let full_name = format!("{}:{}", domain, key_properties);
        let Some(name) = parse_or_skip(&full_name) else {
            continue;
        };

        let descriptors = info
            .get("attr")
            .and_then(Value::as_object)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(attr_name, attr_info)| AttributeDescriptor {
                        name: attr_name.clone(),
                        declared_type: attr_info
                            .get("type")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        description: attr_info
                            .get("desc")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        readable: true,
                    })
                    .collect()
            })
            .unwrap_or_default();

        result.push((name, descriptors));
    }

    Ok(result)
}

/// `read` 응답 값 파싱 - ObjectName → (attribute 이름 → JSON 값)
///
/// Pattern reads are keyed by object name; a read of a single object returns
/// the attribute map directly.
pub fn parse_read_value(
    pattern: &ObjectNamePattern,
    mbean: &str,
    value: &Value,
) -> CollectResult<Vec<(ObjectName, HashMap<String, Value>)>> {
    let map = value
        .as_object()
        .ok_or_else(|| CollectorError::JsonParse("read value is not an object".to_string()))?;

    if !pattern.is_pattern() {
        let name = ObjectName::parse(mbean)?;
        let attrs = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        return Ok(vec![(name, attrs)]);
    }

    let mut result = Vec::with_capacity(map.len());
    for (object_name, attrs) in map {
        let Some(name) = parse_or_skip(object_name) else {
            continue;
        };
        let attrs = attrs
            .as_object()
            .map(|a| a.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        result.push((name, attrs));
    }
    Ok(result)
}

/// Prefix Jolokia puts on the value of a getter that threw when `ignoreErrors` is set
const READ_FAULT_PREFIX: &str = "ERROR: ";

/// Whether a read value is Jolokia's replacement for a failed getter
///
/// A string where the list declared another type is a fault, as is any string
/// carrying the fault prefix.
pub fn is_read_fault(value: &Value, declared_type: &str) -> bool {
    let Value::String(s) = value else {
        return false;
    };
    let declared_string = declared_type.is_empty()
        || declared_type == "java.lang.String"
        || declared_type == "String";
    !declared_string || s.starts_with(READ_FAULT_PREFIX)
}

/// JSON 값을 attribute 값으로 변환
///
/// `declared_type` disambiguates empty `CompositeData[]` arrays.
pub fn attribute_value_from_json(value: &Value, declared_type: &str) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Boolean(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => AttributeValue::Number(f),
            None => AttributeValue::Unsupported,
        },
        Value::String(s) => AttributeValue::String(s.clone()),
        Value::Object(map) => AttributeValue::CompositeRecord(composite_from_json(map)),
        Value::Array(items) => {
            let all_objects = items.iter().all(Value::is_object);
            let declared_composite = declared_type.starts_with(COMPOSITE_ARRAY_TYPE);
            if all_objects && (declared_composite || !items.is_empty()) {
                AttributeValue::CompositeRecordArray(
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(composite_from_json)
                        .collect(),
                )
            } else {
                AttributeValue::Unsupported
            }
        }
    }
}

fn composite_from_json(map: &serde_json::Map<String, Value>) -> CompositeRecord {
    map.iter()
        .map(|(k, v)| (k.clone(), attribute_value_from_json(v, "")))
        .collect()
}
