//! MBean ObjectName 및 패턴
//!
//! `domain:key=value,...` 형식의 이름을 파싱합니다. Key property 순서는 보존되며,
//! 첫 번째 property 값이 object의 kind로 사용됩니다.

use std::fmt;

use regex::Regex;

use super::parser::CollectResult;
use crate::error::{CollectorError, RegistryError};

/// MBean ObjectName 구조
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    /// 도메인 (예: "io.crate.monitoring")
    pub domain: String,
    /// Key property 목록 (삽입 순서 유지, 예: [("type", "QueryStats")])
    pub properties: Vec<(String, String)>,
}

impl ObjectName {
    /// ObjectName 문자열 파싱
    ///
    /// # Limitations
    /// - Quoted keys/values are NOT supported
    pub fn parse(s: &str) -> CollectResult<Self> {
        let (domain, props) = s
            .split_once(':')
            .ok_or_else(|| CollectorError::InvalidObjectName(s.to_string()))?;

        if domain.is_empty() || domain.contains(['*', '?']) {
            return Err(CollectorError::InvalidObjectName(s.to_string()));
        }

        let properties = parse_properties(props)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CollectorError::InvalidObjectName(s.to_string()))?;

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

    /// Create an ObjectName from a domain and ordered key properties
    pub fn new<K, V>(domain: &str, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            domain: domain.to_string(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 첫 번째 key property 값 (object의 kind, 예: "QueryStats")
    pub fn primary_property(&self) -> Option<&str> {
        self.properties.first().map(|(_, v)| v.as_str())
    }

    /// Key property 조회
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `key=value,key=value` 형식의 property 문자열
    pub fn key_property_list(&self) -> String {
        self.properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.key_property_list())
    }
}

/// ObjectName 패턴 (예: `io.crate.monitoring:*`, `io.crate.monitoring:type=QueryStats`)
///
/// The domain and property values may contain `*` and `?` wildcards. A trailing
/// `*` element in the property list allows additional properties.
#[derive(Debug, Clone)]
pub struct ObjectNamePattern {
    domain: Glob,
    properties: Vec<(String, Glob)>,
    property_list_wildcard: bool,
    raw: String,
}

/// `*` / `?` wildcard compiled into an anchored regex
#[derive(Debug, Clone)]
struct Glob {
    source: String,
    regex: Regex,
}

impl Glob {
    fn compile(source: &str) -> Option<Self> {
        let escaped = regex::escape(source)
            .replace(r"\*", ".*")
            .replace(r"\?", ".");
        let regex = Regex::new(&format!("^{}$", escaped)).ok()?;
        Some(Self {
            source: source.to_string(),
            regex,
        })
    }

    fn is_wildcard(&self) -> bool {
        self.source.contains(['*', '?'])
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl ObjectNamePattern {
    /// 패턴 문자열 파싱
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        let malformed = || RegistryError::MalformedPattern(s.to_string());

        let (domain, props) = s.split_once(':').ok_or_else(malformed)?;
        if domain.is_empty() {
            return Err(malformed());
        }

        let mut property_list_wildcard = false;
        let mut rest = Vec::new();
        for element in props.split(',') {
            if element == "*" {
                property_list_wildcard = true;
            } else {
                rest.push(element);
            }
        }

        let properties = parse_properties(&rest.join(",")).ok_or_else(malformed)?;
        if properties.is_empty() && !property_list_wildcard {
            return Err(malformed());
        }

        let properties = properties
            .into_iter()
            .map(|(key, value)| Glob::compile(&value).map(|glob| (key, glob)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(malformed)?;

        Ok(Self {
            domain: Glob::compile(domain).ok_or_else(malformed)?,
            properties,
            property_list_wildcard,
            raw: s.to_string(),
        })
    }

    /// 패턴이 wildcard를 포함하는지 여부
    pub fn is_pattern(&self) -> bool {
        self.property_list_wildcard
            || self.domain.is_wildcard()
            || self.properties.iter().any(|(_, glob)| glob.is_wildcard())
    }

    /// Pattern domain (may contain wildcards)
    pub fn domain(&self) -> &str {
        &self.domain.source
    }

    /// ObjectName이 패턴과 일치하는지 확인
    pub fn matches(&self, name: &ObjectName) -> bool {
        if !self.domain.is_match(&name.domain) {
            return false;
        }

        let all_listed_match = self.properties.iter().all(|(key, glob)| {
            name.property(key)
                .map(|value| glob.is_match(value))
                .unwrap_or(false)
        });
        if !all_listed_match {
            return false;
        }

        self.property_list_wildcard || name.properties.len() == self.properties.len()
    }
}

impl PartialEq for ObjectNamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ObjectNamePattern {}

impl fmt::Display for ObjectNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// `k=v,k=v` 파싱. 빈 문자열은 빈 목록, 형식 오류는 None
fn parse_properties(s: &str) -> Option<Vec<(String, String)>> {
    if s.is_empty() {
        return Some(Vec::new());
    }

    let mut properties: Vec<(String, String)> = Vec::new();
    for prop in s.split(',') {
        let (key, value) = prop.split_once('=')?;
        if key.is_empty() || properties.iter().any(|(k, _)| k == key) {
            return None;
        }
        properties.push((key.to_string(), value.to_string()));
    }
    Some(properties)
}
