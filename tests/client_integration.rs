// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests for the Infoblox DNS client against a mock WAPI server.
//!
//! Run with: cargo test --test client_integration

mod common;

use common::{
    basic_auth_header, client_with_config, record_ref, test_client, test_config, wapi_error,
    wapi_path, wapi_record, ZONE,
};
use ibdns::dns_errors::{DnsError, GridError, RecordError};
use ibdns::{DnsClient, RecordType};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Zones
// ============================================================================

#[tokio::test]
async fn test_get_managed_zones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .and(query_param("_return_fields", "fqdn,view"))
        .and(header("authorization", basic_auth_header().as_str()))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_ref": "zone_auth/ZG5zLnpvbmUkLl9kZWZhdWx0LmNvbS5leGFtcGxl:example.com/default", "fqdn": "example.com", "view": "default"},
            {"_ref": "zone_auth/ZG5zLnpvbmUkLl9kZWZhdWx0Lm9yZy5leGFtcGxl:example.org/default", "fqdn": "example.org", "view": "default"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let zones = test_client(&server).get_managed_zones().await.unwrap();

    assert_eq!(zones.len(), 2);
    assert_eq!(
        zones.get("zone_auth/ZG5zLnpvbmUkLl9kZWZhdWx0LmNvbS5leGFtcGxl:example.com/default"),
        Some(&"example.com".to_string())
    );
    assert!(zones.values().any(|fqdn| fqdn == "example.org"));
}

#[tokio::test]
async fn test_get_managed_zones_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let zones = test_client(&server).get_managed_zones().await.unwrap();
    assert!(zones.is_empty());
}

#[tokio::test]
async fn test_authentication_failure_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Required"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ibdns::InfobloxConfig {
        http_retry_max_elapsed: Some(5),
        ..test_config(&server)
    };
    let error = client_with_config(&config)
        .get_managed_zones()
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DnsError::Grid(GridError::AuthenticationFailed {
            status_code: 401,
            ..
        })
    ));
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_ref": "zone_auth/ZG5z:example.com/default", "fqdn": "example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ibdns::InfobloxConfig {
        http_retry_max_elapsed: Some(10),
        ..test_config(&server)
    };
    let zones = client_with_config(&config)
        .get_managed_zones()
        .await
        .unwrap();

    assert_eq!(zones.len(), 1);
}

#[tokio::test]
async fn test_retries_disabled_with_zero_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let error = test_client(&server).get_managed_zones().await.unwrap_err();
    assert!(matches!(
        error,
        DnsError::Grid(GridError::GridUnavailable {
            status_code: 503,
            ..
        })
    ));
}

#[tokio::test]
async fn test_malformed_response_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("zone_auth")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let error = test_client(&server).get_managed_zones().await.unwrap_err();
    assert!(matches!(
        error,
        DnsError::Grid(GridError::UnexpectedResponse { .. })
    ));
}

#[tokio::test]
async fn test_connection_failure() {
    // Bind and release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{port}");

    let config = ibdns::InfobloxConfig {
        host: Some(uri),
        http_retry_max_elapsed: Some(0),
        ..ibdns::InfobloxConfig::with_defaults()
    };
    let client = ibdns::InfobloxDnsClient::from_config(
        &config,
        ibdns::Credentials::new("admin", "infoblox"),
    )
    .unwrap();

    let error = client.get_managed_zones().await.unwrap_err();
    assert!(
        matches!(error, DnsError::Grid(GridError::HttpConnectionFailed { .. })),
        "unexpected error {error:?}"
    );
    assert!(error.is_transient());
}

// ============================================================================
// Record reads
// ============================================================================

#[tokio::test]
async fn test_get_typed_record_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:aaaa")))
        .and(query_param("zone", ZONE))
        .and(query_param(
            "_return_fields",
            "name,ipv6addr,view,zone,ttl,use_ttl",
        ))
        .and(query_param_is_missing("_proxy_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:aaaa", "ipv6addr", "v6.example.com", "2001:db8::1", 300),
            wapi_record("record:aaaa", "ipv6addr", "v6.example.com", "2001:db8::2", 300)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server)
        .get_record_set(false, RecordType::AAAA, ZONE)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.record_type == RecordType::AAAA));
    assert_eq!(records[0].value.as_deref(), Some("2001:db8::1"));
    assert_eq!(records[1].ttl, Some(300));
}

#[tokio::test]
async fn test_get_record_set_falls_back_to_grid_master() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:txt")))
        .and(query_param("_proxy_search", "GM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:txt", "text", "txt.example.com", "hello", 60)
        ])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(wapi_path("record:txt")))
        .respond_with(ResponseTemplate::new(400).set_body_json(wapi_error(
            "Client.Ibap.Proto",
            "Zone example.com is not served by this member",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server)
        .get_record_set(false, RecordType::TXT, ZONE)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_get_record_set_returns_proxy_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(400).set_body_json(wapi_error(
            "Client.Ibap.Data.NotFound",
            "Zone not found",
        )))
        .expect(2)
        .mount(&server)
        .await;

    let error = test_client(&server)
        .get_record_set(false, RecordType::A, ZONE)
        .await
        .unwrap_err();

    match error {
        DnsError::Grid(GridError::WapiRejected { code, text, .. }) => {
            assert_eq!(code.as_deref(), Some("Client.Ibap.Data.NotFound"));
            assert_eq!(text, "Zone not found");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_get_all_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("allrecords")))
        .and(query_param("zone", ZONE))
        .and(query_param("_return_fields", "name,type,view,zone,ttl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_ref": "allrecords/ZG5zLmEk:www/example.com/default", "name": "www", "type": "record:a", "view": "default", "zone": ZONE},
            {"_ref": "allrecords/ZG5zLm14JA:mail/example.com/default", "name": "mail", "type": "record:mx", "view": "default", "zone": ZONE},
            {"_ref": "allrecords/ZG5zLnR4dCQ:/example.com/default", "name": "", "type": "record:txt", "view": "default", "zone": ZONE},
            {"_ref": "allrecords/ZG5zLmNuYW1lJA:alias/example.com/default", "name": "alias", "type": "record:cname", "view": "default", "zone": ZONE, "ttl": 900}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = test_client(&server)
        .get_record_set(true, RecordType::A, ZONE)
        .await
        .unwrap();

    let summary: Vec<(String, RecordType)> = records
        .iter()
        .map(|r| (r.name.clone(), r.record_type))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("www.example.com".to_string(), RecordType::A),
            ("example.com".to_string(), RecordType::TXT),
            ("alias.example.com".to_string(), RecordType::CNAME),
        ]
    );
    assert!(records.iter().all(|r| r.value.is_none()));
    assert_eq!(records[2].ttl, Some(900));
}

#[tokio::test]
async fn test_max_results_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:cname")))
        .and(query_param("_max_results", "-2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ibdns::InfobloxConfig {
        max_results: -2000,
        ..test_config(&server)
    };
    let records = client_with_config(&config)
        .get_record_set(false, RecordType::CNAME, ZONE)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_max_results_is_not_sent_with_writes() {
    let server = MockServer::start().await;
    let old_ref = record_ref("record:a", "www.example.com", "192.0.2.1");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .and(query_param("_max_results", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([wapi_record(
            "record:a",
            "ipv4addr",
            "www.example.com",
            "192.0.2.1",
            300
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&old_ref)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(old_ref)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(record_ref(
            "record:a",
            "www.example.com",
            "192.0.2.2"
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let config = ibdns::InfobloxConfig {
        max_results: 500,
        ..test_config(&server)
    };
    client_with_config(&config)
        .create_or_update_record_set(
            "default",
            "www.example.com",
            ZONE,
            RecordType::A,
            &["192.0.2.2".to_string()],
            0,
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap_or_default();
    let writes: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() != "GET")
        .collect();
    assert_eq!(writes.len(), 2);
    for request in writes {
        assert_eq!(request.url.query(), None, "{} {}", request.method, request.url);
    }
}

// ============================================================================
// Record set updates
// ============================================================================

#[tokio::test]
async fn test_upsert_creates_missing_record_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("record:a")))
        .and(header("authorization", basic_auth_header().as_str()))
        .and(body_json(json!({
            "name": "www.example.com",
            "view": "default",
            "ipv4addr": "192.0.2.10",
            "ttl": 300,
            "use_ttl": true
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!(record_ref("record:a", "www.example.com", "192.0.2.10"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .create_or_update_record_set(
            "default",
            "www.example.com",
            ZONE,
            RecordType::A,
            &["192.0.2.10".to_string()],
            300,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upsert_replaces_changed_record_set() {
    let server = MockServer::start().await;
    let old_ref = record_ref("record:cname", "alias.example.com", "old.example.net");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:cname")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:cname", "canonical", "alias.example.com", "old.example.net", 300),
            wapi_record("record:cname", "canonical", "other.example.com", "keep.example.net", 300)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&old_ref)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(old_ref)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("record:cname")))
        .and(body_json(json!({
            "name": "alias.example.com",
            "view": "default",
            "canonical": "new.example.net"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(record_ref(
            "record:cname",
            "alias.example.com",
            "new.example.net"
        ))))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .create_or_update_record_set(
            "",
            "alias.example.com.",
            ZONE,
            RecordType::CNAME,
            &["new.example.net.".to_string()],
            0,
        )
        .await
        .unwrap();

    // The unrelated name was left alone
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(
        requests
            .iter()
            .filter(|r| r.method.as_str() == "DELETE")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_upsert_skips_matching_record_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:a", "ipv4addr", "www.example.com", "192.0.2.1", 300),
            wapi_record("record:a", "ipv4addr", "www.example.com", "192.0.2.2", 300)
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    test_client(&server)
        .create_or_update_record_set(
            "default",
            "www.example.com",
            ZONE,
            RecordType::A,
            &["192.0.2.2".to_string(), "192.0.2.1".to_string()],
            300,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upsert_replaces_txt_value_differing_by_trailing_dot() {
    let server = MockServer::start().await;
    let old_ref = record_ref("record:txt", "example.com", "v=spf1 -all");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([wapi_record(
            "record:txt",
            "text",
            "example.com",
            "v=spf1 -all",
            300
        )])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&old_ref)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(old_ref)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("record:txt")))
        .and(body_json(json!({
            "name": "example.com",
            "view": "default",
            "text": "v=spf1 -all."
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(record_ref(
            "record:txt",
            "example.com",
            "v=spf1 -all."
        ))))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .create_or_update_record_set(
            "default",
            "example.com",
            ZONE,
            RecordType::TXT,
            &["v=spf1 -all.".to_string()],
            0,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upsert_with_no_values_removes_record_set() {
    let server = MockServer::start().await;
    let existing_ref = record_ref("record:txt", "txt.example.com", "stale");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:txt", "text", "txt.example.com", "stale", 60)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&existing_ref)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(existing_ref)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    test_client(&server)
        .create_or_update_record_set("default", "txt.example.com", ZONE, RecordType::TXT, &[], 0)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upsert_rejects_invalid_value_before_any_request() {
    let server = MockServer::start().await;

    let error = test_client(&server)
        .create_or_update_record_set(
            "default",
            "www.example.com",
            ZONE,
            RecordType::A,
            &["192.0.2.1".to_string(), "not-an-ip".to_string()],
            0,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DnsError::Record(RecordError::InvalidRecordData { .. })
    ));
    assert!(server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn test_upsert_reports_rejected_creation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(400).set_body_json(wapi_error(
            "Client.Ibap.Data.Conflict",
            "The record 'www.example.com' already exists.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let error = test_client(&server)
        .create_or_update_record_set(
            "default",
            "www.example.com",
            ZONE,
            RecordType::A,
            &["192.0.2.1".to_string()],
            0,
        )
        .await
        .unwrap_err();

    match error {
        DnsError::Record(RecordError::RecordCreationFailed {
            name,
            record_type,
            reason,
        }) => {
            assert_eq!(name, "www.example.com");
            assert_eq!(record_type, "A");
            assert_eq!(reason, "The record 'www.example.com' already exists.");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// ============================================================================
// Record set deletion
// ============================================================================

#[tokio::test]
async fn test_delete_record_set_only_deletes_matching_name() {
    let server = MockServer::start().await;
    let first = record_ref("record:a", "www.example.com", "192.0.2.1");
    let second = record_ref("record:a", "www.example.com", "192.0.2.2");
    let other = record_ref("record:a", "api.example.com", "192.0.2.3");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:a", "ipv4addr", "www.example.com", "192.0.2.1", 300),
            wapi_record("record:a", "ipv4addr", "www.example.com", "192.0.2.2", 300),
            wapi_record("record:a", "ipv4addr", "api.example.com", "192.0.2.3", 300)
        ])))
        .mount(&server)
        .await;
    for reference in [&first, &second] {
        Mock::given(method("DELETE"))
            .and(path(wapi_path(reference)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(reference)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&other)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(other)))
        .expect(0)
        .mount(&server)
        .await;

    test_client(&server)
        .delete_record_set(ZONE, "WWW.example.com", RecordType::A)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_record_set_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(wapi_path("record:txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    test_client(&server)
        .delete_record_set(ZONE, "gone.example.com", RecordType::TXT)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_reports_rejected_deletion() {
    let server = MockServer::start().await;
    let reference = record_ref("record:a", "www.example.com", "192.0.2.1");

    Mock::given(method("GET"))
        .and(path(wapi_path("record:a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            wapi_record("record:a", "ipv4addr", "www.example.com", "192.0.2.1", 300)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(wapi_path(&reference)))
        .respond_with(ResponseTemplate::new(404).set_body_json(wapi_error(
            "Client.Ibap.Data.NotFound",
            "Reference not found",
        )))
        .mount(&server)
        .await;

    let error = test_client(&server)
        .delete_record_set(ZONE, "www.example.com", RecordType::A)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DnsError::Record(RecordError::RecordDeletionFailed { ref reason, .. }) if reason == "Reference not found"
    ));
}
