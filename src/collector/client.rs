//! Jolokia HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.
//! 한 번의 scrape에 필요한 search / list / read 결과를 snapshot으로 묶어 반환합니다.

use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::object_name::{ObjectName, ObjectNamePattern};
use super::parser::{
    parse_list_value, parse_read_value, parse_response, parse_search_value, CollectResult,
    JolokiaResponse,
};
use super::snapshot::RegistrySnapshot;
use super::AttributeDescriptor;
use crate::error::CollectorError;

/// Jolokia HTTP 클라이언트
#[derive(Clone)]
pub struct JolokiaClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
    auth: Option<(String, String)>,
}

/// Jolokia 요청 구조체
#[derive(Debug, Serialize)]
struct JolokiaRequest<'a> {
    #[serde(rename = "type")]
    request_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mbean: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<RequestConfig>,
}

/// Jolokia 요청 처리 옵션
#[derive(Debug, Serialize)]
struct RequestConfig {
    /// 실패한 attribute getter를 요청 전체 실패 대신 에러 문자열 값으로 반환
    #[serde(rename = "ignoreErrors")]
    ignore_errors: bool,
}

impl JolokiaClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Jolokia 엔드포인트 URL (예: "http://localhost:8778/jolokia")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    pub fn new(base_url: &str, timeout_ms: u64) -> CollectResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
            auth: None,
        })
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = Some((username.to_string(), password.to_string()));
        self
    }

    /// 엔드포인트 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// MBean 목록 조회 (Search)
    #[instrument(skip(self, pattern), fields(pattern = %pattern))]
    pub async fn search_mbeans(&self, pattern: &ObjectNamePattern) -> CollectResult<Vec<ObjectName>> {
        let pattern = pattern.to_string();
        let response = self
            .send(&JolokiaRequest {
                request_type: "search",
                mbean: Some(&pattern),
                path: None,
                config: None,
            })
            .await?;

        parse_search_value(&response.value)
    }

    /// Attribute descriptor 조회 (List)
    #[instrument(skip(self))]
    pub async fn list_attributes(
        &self,
        domain: &str,
    ) -> CollectResult<Vec<(ObjectName, Vec<AttributeDescriptor>)>> {
        let response = self
            .send(&JolokiaRequest {
                request_type: "list",
                mbean: None,
                path: Some(domain),
                config: None,
            })
            .await?;

        parse_list_value(domain, &response.value)
    }

    /// 패턴에 해당하는 모든 attribute 값 조회 (Read)
    #[instrument(skip(self, pattern), fields(pattern = %pattern))]
    pub async fn read_attributes(
        &self,
        pattern: &ObjectNamePattern,
    ) -> CollectResult<Vec<(ObjectName, std::collections::HashMap<String, serde_json::Value>)>>
    {
        let mbean = pattern.to_string();
        let response = self
            .send(&JolokiaRequest {
                request_type: "read",
                mbean: Some(&mbean),
                path: None,
                config: Some(RequestConfig {
                    ignore_errors: true,
                }),
            })
            .await?;

        parse_read_value(pattern, &mbean, &response.value)
    }

    /// 한 번의 pass에 필요한 registry snapshot 생성
    ///
    /// # Errors
    /// Returns an error if any of the search, list or read requests fails.
    pub async fn snapshot(&self, pattern: &ObjectNamePattern) -> CollectResult<RegistrySnapshot> {
        let names = self.search_mbeans(pattern).await?;
        if names.is_empty() {
            debug!(pattern = %pattern, "No objects matched pattern");
            return Ok(RegistrySnapshot::new());
        }

        let listed = self.list_attributes(pattern.domain()).await?;
        let read = self.read_attributes(pattern).await?;

        debug!(
            objects = names.len(),
            listed = listed.len(),
            read = read.len(),
            "Registry snapshot fetched"
        );

        Ok(RegistrySnapshot::assemble(names, listed, read))
    }

    async fn send(&self, request: &JolokiaRequest<'_>) -> CollectResult<JolokiaResponse> {
        debug!(request_type = request.request_type, "Sending Jolokia request");

        let mut req = self.client.post(&self.base_url).json(request);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, Some(password));
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                CollectorError::timeout_with_duration(self.timeout_ms)
            } else {
                CollectorError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(CollectorError::HttpResponse)?;

        parse_response(&body)?.into_success()
    }
}
