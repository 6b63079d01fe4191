//! Collector 통합 테스트
//!
//! wiremock을 사용한 Jolokia 에이전트 모킹 테스트

use std::sync::Arc;

use crate_jmx_exporter::collector::{
    AttributeValue, JolokiaClient, ManagedObjectRegistry, ObjectName, ObjectNamePattern,
    RegistrySource,
};
use crate_jmx_exporter::error::CollectorError;
use crate_jmx_exporter::transformer::{AttributeValueStore, EngineSettings, TranslationEngine};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PATTERN: &str = "io.crate.monitoring:*";

async fn mount_crate_agent(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/jolokia"))
        .and(body_partial_json(json!({"type": "search"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "search", "mbean": PATTERN},
            "value": [
                "io.crate.monitoring:type=QueryStats",
                "io.crate.monitoring:type=NodeStatus",
                "io.crate.monitoring:type=NodeInfo"
            ],
            "timestamp": 1609459200,
            "status": 200
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jolokia"))
        .and(body_partial_json(json!({"type": "list"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "list", "path": "io.crate.monitoring"},
            "value": {
                "type=QueryStats": {
                    "desc": "Statistics of executed queries",
                    "attr": {
                        "SelectQueryTotalCount": {"type": "long", "desc": "SelectQueryTotalCount", "rw": false},
                        "SelectQueryFrequency": {"type": "double", "desc": "SelectQueryFrequency", "rw": false}
                    }
                },
                "type=NodeStatus": {
                    "desc": "Node status",
                    "attr": {
                        "Ready": {"type": "boolean", "desc": "Ready", "rw": false}
                    }
                },
                "type=NodeInfo": {
                    "desc": "Node information",
                    "attr": {
                        "NodeId": {"type": "java.lang.String", "desc": "NodeId", "rw": false},
                        "NodeName": {"type": "java.lang.String", "desc": "NodeName", "rw": false},
                        "ShardInfo": {
                            "type": "[Ljavax.management.openmbean.CompositeData;",
                            "desc": "ShardInfo",
                            "rw": false
                        }
                    }
                }
            },
            "timestamp": 1609459200,
            "status": 200
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jolokia"))
        .and(body_partial_json(json!({"type": "read"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "read", "mbean": PATTERN},
            "value": {
                "io.crate.monitoring:type=QueryStats": {
                    "SelectQueryTotalCount": 7,
                    "SelectQueryFrequency": 2.5
                },
                "io.crate.monitoring:type=NodeStatus": {
                    "Ready": true
                },
                "io.crate.monitoring:type=NodeInfo": {
                    "NodeId": "yBg3GbZxQ7mCHjyJpj5Dnw",
                    "NodeName": "Monte Civetta",
                    "ShardInfo": []
                }
            },
            "timestamp": 1609459200,
            "status": 200
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> JolokiaClient {
    JolokiaClient::new(&format!("{}/jolokia", server.uri()), 5000).unwrap()
}

#[tokio::test]
async fn test_snapshot_from_jolokia() {
    let mock_server = MockServer::start().await;
    mount_crate_agent(&mock_server).await;

    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let snapshot = client(&mock_server).snapshot(&pattern).await.unwrap();
    assert_eq!(snapshot.len(), 3);

    let query_stats = ObjectName::parse("io.crate.monitoring:type=QueryStats").unwrap();
    let descriptors = snapshot.describe(&query_stats).unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(
        snapshot.read(&query_stats, "SelectQueryTotalCount").unwrap(),
        AttributeValue::Number(7.0)
    );

    let node_info = ObjectName::parse("io.crate.monitoring:type=NodeInfo").unwrap();
    assert_eq!(
        snapshot.read(&node_info, "ShardInfo").unwrap(),
        AttributeValue::CompositeRecordArray(Vec::new())
    );
    assert!(snapshot.read(&node_info, "Missing").is_err());
}

#[tokio::test]
async fn test_engine_pass_over_jolokia() {
    let mock_server = MockServer::start().await;
    mount_crate_agent(&mock_server).await;

    let store = Arc::new(AttributeValueStore::new());
    let engine = TranslationEngine::new(EngineSettings::default(), Arc::clone(&store));
    let source = RegistrySource::Jolokia(client(&mock_server));

    let families = engine.scrape(&source).await.unwrap();
    let names: Vec<&str> = families.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "crate_node_info",
            "crate_queries",
            "crate_query_total_count",
            "crate_ready"
        ]
    );

    let node_info = &families[0];
    assert_eq!(
        node_info.samples[0].label_values,
        vec!["yBg3GbZxQ7mCHjyJpj5Dnw", "Monte Civetta"]
    );
    assert_eq!(store.get("NodeStatus_Ready"), Some(AttributeValue::Boolean(true)));
}

#[tokio::test]
async fn test_empty_search_skips_list_and_read() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"type": "search"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "search", "mbean": PATTERN},
            "value": [],
            "status": 200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let snapshot = client(&mock_server).snapshot(&pattern).await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn test_timeout_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let url = format!("{}/jolokia", mock_server.uri());
    let client = JolokiaClient::new(&url, 100).unwrap();
    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let result = client.snapshot(&pattern).await;

    assert!(matches!(result, Err(CollectorError::Timeout(Some(100)))));
}

#[tokio::test]
async fn test_jolokia_error_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "search", "mbean": PATTERN},
            "error_type": "java.lang.SecurityException",
            "error": "Access denied",
            "status": 403
        })))
        .mount(&mock_server)
        .await;

    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let err = client(&mock_server).snapshot(&pattern).await.unwrap_err();

    assert_eq!(err.http_status(), Some(403));
    assert!(err.to_string().contains("Access denied"));
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let err = client(&mock_server).snapshot(&pattern).await.unwrap_err();
    assert!(matches!(err, CollectorError::HttpStatus(503)));
}

#[tokio::test]
async fn test_unreachable_agent_yields_empty_pass() {
    // nothing listens on port 1
    let source = RegistrySource::Jolokia(JolokiaClient::new("http://127.0.0.1:1/jolokia", 500).unwrap());
    let engine = TranslationEngine::new(
        EngineSettings::default(),
        Arc::new(AttributeValueStore::new()),
    );

    let families = engine.scrape(&source).await.unwrap();
    assert!(families.is_empty());
}

#[tokio::test]
async fn test_basic_auth_sent() {
    let mock_server = MockServer::start().await;

    // "monitor:secret"
    Mock::given(method("POST"))
        .and(wiremock::matchers::header(
            "authorization",
            "Basic bW9uaXRvcjpzZWNyZXQ=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "search", "mbean": PATTERN},
            "value": [],
            "status": 200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pattern = ObjectNamePattern::parse(PATTERN).unwrap();
    let snapshot = client(&mock_server)
        .with_auth("monitor", "secret")
        .snapshot(&pattern)
        .await
        .unwrap();
    assert!(snapshot.is_empty());
}

async fn mount_response(server: &MockServer, request_type: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/jolokia"))
        .and(body_partial_json(json!({"type": request_type})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unparsable_object_name_skipped() {
    let mock_server = MockServer::start().await;

    mount_response(
        &mock_server,
        "search",
        json!({
            "request": {"type": "search", "mbean": PATTERN},
            "value": [
                "io.crate.monitoring:type=NodeStatus",
                "io.crate.monitoring:type=Odd,name=\"a,b\""
            ],
            "status": 200
        }),
    )
    .await;
    mount_response(
        &mock_server,
        "list",
        json!({
            "request": {"type": "list", "path": "io.crate.monitoring"},
            "value": {
                "type=NodeStatus": {"attr": {"Ready": {"type": "boolean", "desc": "Ready"}}},
                "name=\"a,b\",type=Odd": {"attr": {"Count": {"type": "long", "desc": "Count"}}}
            },
            "status": 200
        }),
    )
    .await;
    mount_response(
        &mock_server,
        "read",
        json!({
            "request": {"type": "read", "mbean": PATTERN},
            "value": {
                "io.crate.monitoring:type=NodeStatus": {"Ready": true},
                "io.crate.monitoring:type=Odd,name=\"a,b\"": {"Count": 3}
            },
            "status": 200
        }),
    )
    .await;

    let store = Arc::new(AttributeValueStore::new());
    let engine = TranslationEngine::new(EngineSettings::default(), Arc::clone(&store));
    let families = engine
        .scrape(&RegistrySource::Jolokia(client(&mock_server)))
        .await
        .unwrap();

    let names: Vec<&str> = families.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["crate_ready"]);
    assert_eq!(families[0].samples[0].value, 1.0);
    assert_eq!(store.get("NodeStatus_Ready"), Some(AttributeValue::Boolean(true)));
}

#[tokio::test]
async fn test_failed_getter_fails_only_its_attribute() {
    let mock_server = MockServer::start().await;

    mount_response(
        &mock_server,
        "search",
        json!({
            "request": {"type": "search", "mbean": PATTERN},
            "value": [
                "io.crate.monitoring:type=NodeStatus",
                "io.crate.monitoring:type=NodeInfo"
            ],
            "status": 200
        }),
    )
    .await;
    mount_response(
        &mock_server,
        "list",
        json!({
            "request": {"type": "list", "path": "io.crate.monitoring"},
            "value": {
                "type=NodeStatus": {"attr": {"Ready": {"type": "boolean", "desc": "Ready"}}},
                "type=NodeInfo": {"attr": {
                    "NodeId": {"type": "java.lang.String", "desc": "NodeId"},
                    "NodeName": {"type": "java.lang.String", "desc": "NodeName"},
                    "ClusterStateVersion": {"type": "long", "desc": "ClusterStateVersion"}
                }}
            },
            "status": 200
        }),
    )
    .await;

    // only a read asking Jolokia to keep going past failed getters is answered
    Mock::given(method("POST"))
        .and(path("/jolokia"))
        .and(body_partial_json(
            json!({"type": "read", "config": {"ignoreErrors": true}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {"type": "read", "mbean": PATTERN},
            "value": {
                "io.crate.monitoring:type=NodeStatus": {"Ready": false},
                "io.crate.monitoring:type=NodeInfo": {
                    "NodeId": "ERROR: node not started (java.lang.IllegalStateException)",
                    "NodeName": "Monte Civetta",
                    "ClusterStateVersion": "ERROR: null (java.lang.NullPointerException)"
                }
            },
            "status": 200
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(AttributeValueStore::new());
    let engine = TranslationEngine::new(EngineSettings::default(), Arc::clone(&store));
    let families = engine
        .scrape(&RegistrySource::Jolokia(client(&mock_server)))
        .await
        .unwrap();

    let names: Vec<&str> = families.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["crate_ready"]);
    assert_eq!(families[0].samples[0].value, 0.0);
    assert_eq!(store.get("NodeStatus_Ready"), Some(AttributeValue::Boolean(false)));
    assert_eq!(store.get("NodeInfo_NodeId"), None);
    assert_eq!(
        store.get("NodeInfo_NodeName"),
        Some(AttributeValue::String("Monte Civetta".to_string()))
    );
    assert_eq!(engine.metrics().attribute_errors_total.get(), 2);
}
