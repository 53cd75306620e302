#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use landsearch_gateway::obs::{MetricsManager, MetricsRegistry, OperationMetrics};

fn text(m: &MetricsManager) -> String {
    String::from_utf8(m.metrics_snapshot().to_vec()).unwrap()
}

#[test]
fn family_names_and_types() {
    let m = MetricsManager::new().unwrap();
    let out = text(&m);

    assert!(out.contains("# HELP app_http_requests_total Total HTTP requests\n"));
    assert!(out.contains("# TYPE app_http_requests_total counter\n"));
    assert!(out.contains("# HELP app_http_request_duration_seconds HTTP request latency\n"));
    assert!(out.contains("# TYPE app_http_request_duration_seconds histogram\n"));
    assert!(out.contains("# HELP app_error_total Total number of errors\n"));
    assert!(out.contains("# TYPE app_error_total counter\n"));
}

#[test]
fn snapshot_reflects_every_write() {
    let m = MetricsManager::new().unwrap();
    m.increment_request_count("GET", "/api/documents", "200");
    m.increment_request_count("GET", "/api/documents", "200");
    m.increment_request_count("POST", "/api/upload", "500");
    m.observe_request_latency("GET", "/api/documents", 0.2).unwrap();
    m.increment_error_count("ValueError");

    let out = text(&m);
    assert!(out.contains("app_http_requests_total{method=\"GET\",endpoint=\"/api/documents\",status=\"200\"} 2.0\n"));
    assert!(out.contains("app_http_requests_total{method=\"POST\",endpoint=\"/api/upload\",status=\"500\"} 1.0\n"));
    assert!(out.contains(
        "app_http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/api/documents\",le=\"0.1\"} 0.0\n"
    ));
    assert!(out.contains(
        "app_http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/api/documents\",le=\"0.25\"} 1.0\n"
    ));
    assert!(out.contains(
        "app_http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/api/documents\",le=\"+Inf\"} 1.0\n"
    ));
    assert!(out.contains("app_http_request_duration_seconds_count{method=\"GET\",endpoint=\"/api/documents\"} 1.0\n"));
    assert!(out.contains("app_http_request_duration_seconds_sum{method=\"GET\",endpoint=\"/api/documents\"} 0.2\n"));
    assert!(out.contains("app_error_total{error_type=\"ValueError\"} 1.0\n"));
}

#[test]
fn repeated_snapshots_are_identical() {
    let m = MetricsManager::new().unwrap();
    for (method, endpoint) in [("GET", "/b"), ("GET", "/a"), ("DELETE", "/c"), ("POST", "/a")] {
        m.increment_request_count(method, endpoint, "200");
        m.observe_request_latency(method, endpoint, 0.01).unwrap();
    }

    let first = m.metrics_snapshot();
    let second = m.metrics_snapshot();
    assert_eq!(first, second);
}

#[test]
fn zero_latency_is_accepted() {
    let m = MetricsManager::new().unwrap();
    m.observe_request_latency("GET", "/", 0.0).unwrap();
    assert_eq!(m.latency_sample_count("GET", "/"), 1);
}

#[test]
fn shared_registry_exposes_operation_families() {
    let registry = Arc::new(MetricsRegistry::new());
    let m = MetricsManager::with_registry(Arc::clone(&registry)).unwrap();
    let ops = OperationMetrics::with_registry(registry).unwrap();

    let _: Result<(), ()> = ops.monitor_blocking("upsert", || Ok(()));

    let out = text(&m);
    assert!(out.contains("# TYPE pinecone_operations_total counter\n"));
    assert!(out.contains("# TYPE pinecone_operation_latency_seconds histogram\n"));
    assert!(out.contains("pinecone_operations_total{operation_type=\"upsert\",status=\"success\"} 1.0\n"));
    assert!(out.contains("pinecone_operation_latency_seconds_count{operation_type=\"upsert\"} 1.0\n"));
    // no status label on the latency histogram
    assert!(!out.contains("pinecone_operation_latency_seconds_count{operation_type=\"upsert\",status"));
}

#[test]
fn concurrent_writers_lose_nothing() {
    let m = Arc::new(MetricsManager::new().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    m.increment_request_count("GET", "/health", "200");
                    m.observe_request_latency("GET", "/health", 0.001).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(m.request_count("GET", "/health", "200"), 8_000);
    assert_eq!(m.latency_sample_count("GET", "/health"), 8_000);
}
