//! End-to-end checks against a mock Jolokia endpoint.

use std::time::Duration;

use check_artemis::broker::{BrokerApi, FailureKind, JolokiaClient, RoutingType};
use check_artemis::check::{run_check, run_with_timeout, CheckKind, QueuePattern, Status, Thresholds};
use check_artemis::config::ConnectionConfig;
use check_artemis::output::render;

mod common;

fn client_for(addr: std::net::SocketAddr, timeout_secs: u64) -> JolokiaClient {
    let config = ConnectionConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout_secs,
        ..ConnectionConfig::default()
    };
    JolokiaClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_queue_size_end_to_end() {
    let addr = common::start_mock_jolokia(|path| {
        assert!(path.starts_with("/console/jolokia/exec/org.apache.activemq.artemis:broker="));
        assert!(path.contains("listQueues"));
        (200, common::queue_list(&[("ORDER_2024", 50), ("BACKLOG_ORDER", 500)]))
    })
    .await;
    let client = client_for(addr, 5);

    let kind = CheckKind::QueueSize {
        pattern: QueuePattern::new(Some("ORDER_*")),
        thresholds: Thresholds::new(10, 100),
    };
    let outcome = run_check(&kind, &client).await.unwrap();

    assert_eq!(outcome.status, Status::Warning);
    assert_eq!(
        render(kind.label(), &outcome),
        "ARTEMIS_QUEUESIZE WARNING - Queue size is greater than or equal to 10 | 'Queue Size of ORDER_2024'=50;10;100;0"
    );
}

#[tokio::test]
async fn test_queue_age_browses_each_matching_queue() {
    let addr = common::start_mock_jolokia(|path| {
        if path.contains("listQueues") {
            (200, common::queue_list(&[("old", 1), ("empty", 0)]))
        } else if path.contains("browse") && path.contains("old") {
            (200, r#"{"status":200,"value":[{"timestamp":"2000-01-01T00:00:00+01:00"}]}"#.to_string())
        } else {
            (200, r#"{"status":200,"value":[]}"#.to_string())
        }
    })
    .await;
    let client = client_for(addr, 5);

    let kind = CheckKind::QueueAge {
        pattern: QueuePattern::all(),
        thresholds: Thresholds::new(10, 60),
    };
    let outcome = run_check(&kind, &client).await.unwrap();

    assert_eq!(outcome.status, Status::Critical);
    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.summary.starts_with("Some queue is "));
    assert_eq!(outcome.results[1].metric.numeric(), 0);
    assert_eq!(outcome.results[1].status, Status::Ok);
}

#[tokio::test]
async fn test_health_and_exists() {
    let addr = common::start_mock_jolokia(|path| {
        if path.ends_with("/Started") {
            (200, r#"{"status":200,"value":true}"#.to_string())
        } else if path.contains("multicast") {
            (200, r#"{"status":200,"value":{"MessageCount":0}}"#.to_string())
        } else {
            (200, r#"{"status":404,"error_type":"javax.management.InstanceNotFoundException"}"#.to_string())
        }
    })
    .await;
    let client = client_for(addr, 5);

    assert!(client.is_started().await.unwrap());
    assert_eq!(client.lookup_status("events", RoutingType::Anycast).await.unwrap(), 404);

    let outcome = run_check(&CheckKind::Health, &client).await.unwrap();
    assert_eq!(outcome.status, Status::Ok);

    let outcome = run_check(&CheckKind::Exists { name: "events".into() }, &client)
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Ok);
    assert_eq!(outcome.summary, "Found Topic with name events");
}

#[tokio::test]
async fn test_http_error_status_is_network_failure() {
    let addr = common::start_mock_jolokia(|_| (401, "denied".to_string())).await;
    let client = client_for(addr, 5);

    let err = client.list_queues().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);

    let outcome = run_check(&CheckKind::Health, &client).await.unwrap();
    assert_eq!(outcome.status, Status::Unknown);
    assert_eq!(outcome.summary, "ERROR: Fetching network FAILED: HTTP status 401");
}

#[tokio::test]
async fn test_invalid_json_is_decode_failure() {
    let addr = common::start_mock_jolokia(|_| (200, "<html>login</html>".to_string())).await;
    let client = client_for(addr, 5);

    let kind = CheckKind::QueueSize {
        pattern: QueuePattern::all(),
        thresholds: Thresholds::new(10, 100),
    };
    let outcome = run_check(&kind, &client).await.unwrap();
    assert_eq!(outcome.status, Status::Unknown);
    assert!(outcome.summary.starts_with("ERROR: Decoding Json FAILED"));
}

#[tokio::test]
async fn test_list_timeout_yields_single_sentinel() {
    let addr = common::start_slow_mock_jolokia(Duration::from_secs(3), |_| {
        (200, common::queue_list(&[("q", 1)]))
    })
    .await;
    let client = client_for(addr, 1);

    let kind = CheckKind::QueueSize {
        pattern: QueuePattern::all(),
        thresholds: Thresholds::new(10, 100),
    };
    let outcome = run_with_timeout(&kind, &client, kind.deadline(Duration::from_secs(1))).await;

    assert_eq!(outcome.status, Status::Unknown);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].metric.numeric(), -1);
    assert!(outcome.summary.contains("Fetching network FAILED"));
}

#[tokio::test]
async fn test_overall_deadline_aborts_the_pass() {
    let addr = common::start_slow_mock_jolokia(Duration::from_secs(5), |_| {
        (200, common::queue_list(&[]))
    })
    .await;
    let client = client_for(addr, 30);

    let outcome = run_with_timeout(&CheckKind::Health, &client, Duration::from_secs(1)).await;
    assert_eq!(outcome.status, Status::Unknown);
    assert_eq!(outcome.summary, "Timeout: check execution aborted after 1 seconds");
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn test_dlq_delta_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let kind = CheckKind::Dlq {
        prefix: "DLQ".into(),
        cache_dir: dir.path().to_string_lossy().into_owned(),
        thresholds: Thresholds::new(10, 100),
    };

    let first = common::start_mock_jolokia(|_| {
        (200, common::queue_list(&[("DLQ.orders", 5), ("orders", 9)]))
    })
    .await;
    let outcome = run_check(&kind, &client_for(first, 5)).await.unwrap();
    assert_eq!(outcome.status, Status::Ok);
    assert_eq!(outcome.results[0].metric.name, "First check for DLQ DLQ.orders");

    let cache_file = dir.path().join("activemq-nagios-plugin").join("dlq-cache.json");
    assert_eq!(std::fs::read_to_string(&cache_file).unwrap(), r#"{"DLQ.orders":5}"#);

    let second = common::start_mock_jolokia(|_| (200, common::queue_list(&[("DLQ.orders", 8)]))).await;
    let outcome = run_check(&kind, &client_for(second, 5)).await.unwrap();
    assert_eq!(outcome.status, Status::Critical);
    assert_eq!(outcome.results[0].metric.name, "More messages in DLQ.orders");
    assert_eq!(outcome.results[0].metric.numeric(), 3);
    assert_eq!(outcome.summary, "More messages in DLQ.orders is 3");
    assert_eq!(std::fs::read_to_string(&cache_file).unwrap(), r#"{"DLQ.orders":8}"#);
}
