// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `types.rs`

#[cfg(test)]
mod tests {
    use super::super::{WapiErrorBody, WapiRecord, ZoneAuth};

    #[test]
    fn test_parse_typed_record() {
        let json = r#"{
            "_ref": "record:a/ZG5zLmJpbmRfYSQuX2RlZmF1bHQ:www.example.com/default",
            "ipv4addr": "192.0.2.10",
            "name": "www.example.com",
            "view": "default",
            "zone": "example.com",
            "ttl": 300,
            "use_ttl": true
        }"#;

        let record: WapiRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.reference,
            "record:a/ZG5zLmJpbmRfYSQuX2RlZmF1bHQ:www.example.com/default"
        );
        assert_eq!(record.name, "www.example.com");
        assert_eq!(record.ipv4addr.as_deref(), Some("192.0.2.10"));
        assert_eq!(record.ttl, Some(300));
        assert_eq!(record.object_type, None);
        assert_eq!(record.text, None);
    }

    #[test]
    fn test_parse_all_records_entry() {
        let json = r#"{
            "_ref": "allrecords/ZG5zLnpvbmVfc2VhcmNoX2luZGV4:www/example.com/default",
            "name": "www",
            "type": "record:txt",
            "view": "default",
            "zone": "example.com"
        }"#;

        let record: WapiRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.object_type.as_deref(), Some("record:txt"));
        assert_eq!(record.zone.as_deref(), Some("example.com"));
        assert_eq!(record.ttl, None);
    }

    #[test]
    fn test_record_requires_ref() {
        let result: Result<WapiRecord, _> = serde_json::from_str(r#"{"name": "www"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_zone_auth() {
        let json = r#"[
            {"_ref": "zone_auth/ZG5zLnpvbmUk:example.com/default", "fqdn": "example.com", "view": "default"},
            {"_ref": "zone_auth/ZG5zLnpvbmUl:example.org/default", "fqdn": "example.org"}
        ]"#;

        let zones: Vec<ZoneAuth> = serde_json::from_str(json).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].fqdn, "example.com");
        assert_eq!(zones[0].view.as_deref(), Some("default"));
        assert_eq!(zones[1].view, None);
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{ "Error": "AdmConProtoError: Unknown argument/field: 'foo'",
  "code": "Client.Ibap.Proto",
  "text": "Unknown argument/field: 'foo'"
}"#;

        let error = WapiErrorBody::parse(body).unwrap();
        assert_eq!(error.code.as_deref(), Some("Client.Ibap.Proto"));
        assert_eq!(error.message(), "Unknown argument/field: 'foo'");
    }

    #[test]
    fn test_error_body_message_falls_back_to_error() {
        let error = WapiErrorBody::parse(r#"{"Error": "AdmConDataNotFoundError: Reference not found"}"#)
            .unwrap();
        assert_eq!(error.code, None);
        assert_eq!(
            error.message(),
            "AdmConDataNotFoundError: Reference not found"
        );
    }

    #[test]
    fn test_parse_error_body_rejects_other_content() {
        assert!(WapiErrorBody::parse("").is_none());
        assert!(WapiErrorBody::parse("<html>Bad Gateway</html>").is_none());
        assert!(WapiErrorBody::parse(r#"{"status": "ok"}"#).is_none());
        assert!(WapiErrorBody::parse(r#"["a", "b"]"#).is_none());
    }
}
