#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use landsearch_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
rate_limit:
  enabled: true
  requestz: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert_eq!(err.kind(), "InvalidConfiguration");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.server.api_version, "v1");
    assert!(cfg.rate_limit.enabled);
    assert_eq!(cfg.rate_limit.requests, 100);
    assert_eq!(cfg.rate_limit.period_secs, 60);
    assert!(cfg.metrics.enabled);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn rate_limit_maps_to_bucket() {
    let cfg = config::load_from_str(
        r#"
version: 1
rate_limit:
  requests: 30
  period_secs: 10
"#,
    )
    .unwrap();

    let limiter = cfg.rate_limit.build_limiter().unwrap().expect("enabled by default");
    assert_eq!(limiter.rate(), 3.0);
    assert_eq!(limiter.burst(), 30.0);
}

#[test]
fn disabled_rate_limit_builds_nothing() {
    let cfg = config::load_from_str("version: 1\nrate_limit: { enabled: false }\n").unwrap();
    assert!(cfg.rate_limit.build_limiter().unwrap().is_none());
}

#[test]
fn rejects_bad_values() {
    for bad in [
        "version: 2\n",
        "version: 1\nrate_limit: { requests: 0 }\n",
        "version: 1\nrate_limit: { period_secs: 0 }\n",
        "version: 1\nserver: { listen: \"not-an-addr\" }\n",
        "version: 1\nlogging: { level: \"loud\" }\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.kind(), "InvalidConfiguration", "{bad}");
    }
}
