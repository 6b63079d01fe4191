//! Error types for crate-jmx-exporter
//!
//! This module defines the error types used throughout the application.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::collector::ValueKind;

/// Managed object registry 에러
///
/// 하나의 object 또는 attribute 단위로 발생하며, 수집 pass 전체를 중단시키지 않습니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// 잘못된 ObjectName 패턴
    #[error("Malformed object name pattern '{0}'")]
    MalformedPattern(String),

    /// Registry 자체를 사용할 수 없음 (예: Jolokia 연결 실패)
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    /// Object를 찾을 수 없음 (descriptor 조회 실패)
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// 개별 attribute 읽기 실패
    #[error("Cannot read attribute '{attribute}' of {object}")]
    AttributeUnavailable { object: String, attribute: String },
}

/// Recorder dispatch contract violation
///
/// Raised when a recorder is handed a value variant it does not implement.
/// This indicates a dispatch bug rather than a data issue, so it aborts the pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecorderError {
    #[error("{recorder} cannot be called with {kind} value (attribute '{attribute}')")]
    UnsupportedValue {
        recorder: &'static str,
        kind: ValueKind,
        attribute: String,
    },
}

impl RecorderError {
    pub fn unsupported(recorder: &'static str, kind: ValueKind, attribute: &str) -> Self {
        RecorderError::UnsupportedValue {
            recorder,
            kind,
            attribute: attribute.to_string(),
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Collector error
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Recorder contract violation during a translation pass
    #[error("Translation error: {0}")]
    Recorder(#[from] RecorderError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Collector 모듈 에러 타입
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP 응답 읽기 실패
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// HTTP 상태 코드 에러
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// JSON 파싱 에러
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Jolokia 에러 응답
    #[error("Jolokia error (status {status}): {message}")]
    JolokiaError { status: u16, message: String },

    /// 잘못된 ObjectName
    #[error("Invalid ObjectName: {0}")]
    InvalidObjectName(String),

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl CollectorError {
    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CollectorError::HttpStatus(code) => Some(*code),
            CollectorError::JolokiaError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        CollectorError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured timeout duration
            CollectorError::Timeout(None)
        } else if err.is_connect() {
            CollectorError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            CollectorError::HttpRequest(err)
        } else {
            CollectorError::HttpResponse(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, public_message, log_message) = match self {
            AppError::Config(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error",
                e.to_string(),
            ),
            AppError::Collector(e) => (StatusCode::BAD_GATEWAY, "Collector error", e.to_string()),
            AppError::Recorder(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Translation error",
                e.to_string(),
            ),
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", e),
        };

        tracing::error!(status = %status, error = %log_message, "Request failed");

        (status, public_message).into_response()
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_error_message() {
        let err = RecorderError::unsupported("ThreadPools", ValueKind::Number, "Generic");
        assert_eq!(
            err.to_string(),
            "ThreadPools cannot be called with Number value (attribute 'Generic')"
        );
    }

    #[test]
    fn test_collector_error_http_status() {
        assert_eq!(CollectorError::HttpStatus(503).http_status(), Some(503));
        let err = CollectorError::JolokiaError {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.http_status(), Some(404));
        assert_eq!(CollectorError::Timeout(Some(10)).http_status(), None);
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            CollectorError::Timeout(Some(5000)).to_string(),
            "Request timed out after 5000ms"
        );
        assert_eq!(CollectorError::Timeout(None).to_string(), "Request timed out");
    }

    #[test]
    fn test_recorder_error_into_response() {
        let err = AppError::from(RecorderError::unsupported(
            "NodeStatus",
            ValueKind::CompositeRecord,
            "Ready",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
