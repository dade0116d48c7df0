//! Wire model shared with the external-dns controller
//!
//! Field names follow the external-dns webhook JSON encoding. The
//! controller is written in Go, whose decoder matches keys
//! case-insensitively and whose encoder writes `null` for empty slices.
//! Decoding here accepts three spellings of every key: the canonical one,
//! the Go field name (`DNSName`, `UpdateOld`, ...) and all-lowercase.
//! Other casings such as `Dnsname` are not recognised; like any unknown
//! key they are ignored and the field keeps its default. `null`
//! collections decode as empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Media type (with protocol version) spoken by the webhook
pub const MEDIA_TYPE: &str = "application/vnd.external-dns.webhook+json;version=1";

/// Record kind emitted for every hosts-file entry
pub const RECORD_TYPE_A: &str = "A";

/// A single DNS record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The queried name
    #[serde(rename = "dnsName", alias = "DNSName", alias = "dnsname", default)]
    pub dns_name: String,

    /// Record kind (e.g. `A`)
    #[serde(
        rename = "recordType",
        alias = "RecordType",
        alias = "recordtype",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub record_type: String,

    /// Record values, in order
    #[serde(
        rename = "targets",
        alias = "Targets",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub targets: Vec<String>,

    /// TTL in seconds, absent for records read from the hosts file
    #[serde(
        rename = "recordTTL",
        alias = "RecordTTL",
        alias = "recordttl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub record_ttl: Option<i64>,

    #[serde(
        rename = "setIdentifier",
        alias = "SetIdentifier",
        alias = "setidentifier",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub set_identifier: String,

    #[serde(
        rename = "labels",
        alias = "Labels",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,

    #[serde(
        rename = "providerSpecific",
        alias = "ProviderSpecific",
        alias = "providerspecific",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    /// Create an endpoint with the given name, type and targets
    pub fn new(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        targets: Vec<String>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets,
            ..Self::default()
        }
    }

    /// Create an `A` record pointing `dns_name` at a single address
    pub fn a_record(dns_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self::new(dns_name, RECORD_TYPE_A, vec![address.into()])
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.record_ttl = Some(ttl);
        self
    }

    /// First target, if any
    pub fn first_target(&self) -> Option<&str> {
        self.targets.first().map(String::as_str)
    }
}

/// Provider-specific key/value attached to an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Value", default)]
    pub value: String,
}

/// Change set computed by the controller
///
/// Only `create` and `delete` are applied to the hosts file. The update
/// lists are decoded and re-encoded faithfully but otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(
        rename = "Create",
        alias = "create",
        default,
        deserialize_with = "null_as_default"
    )]
    pub create: Vec<Endpoint>,

    #[serde(
        rename = "UpdateOld",
        alias = "updateOld",
        alias = "updateold",
        default,
        deserialize_with = "null_as_default"
    )]
    pub update_old: Vec<Endpoint>,

    #[serde(
        rename = "UpdateNew",
        alias = "updateNew",
        alias = "updatenew",
        default,
        deserialize_with = "null_as_default"
    )]
    pub update_new: Vec<Endpoint>,

    #[serde(
        rename = "Delete",
        alias = "delete",
        default,
        deserialize_with = "null_as_default"
    )]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Whether the change set contains nothing at all
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }

    /// Whether the change set carries update pairs, which this provider
    /// does not apply
    pub fn has_updates(&self) -> bool {
        !self.update_old.is_empty() || !self.update_new.is_empty()
    }
}

/// Zones and names this provider accepts
///
/// The default value places no restriction and encodes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFilter {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub include: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude: Vec<String>,

    #[serde(
        rename = "regexInclude",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub regex_include: String,

    #[serde(
        rename = "regexExclude",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub regex_exclude: String,
}

impl DomainFilter {
    /// Filter that accepts every name
    pub fn unrestricted() -> Self {
        Self::default()
    }
}

/// Decode a request body into a wire type
///
/// The body's declared content type is not consulted.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> crate::Result<T> {
    Ok(serde_json::from_slice(body)?)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hosts_endpoint_encoding() {
        let ep = Endpoint::a_record("web.local", "192.168.1.1");
        let encoded = serde_json::to_string(&vec![ep]).unwrap();
        assert_eq!(
            encoded,
            r#"[{"dnsName":"web.local","recordType":"A","targets":["192.168.1.1"]}]"#
        );
    }

    #[test]
    fn test_endpoint_accepts_capitalized_keys() {
        let ep: Endpoint = serde_json::from_value(json!({
            "DNSName": "new.example.com",
            "Targets": ["10.0.0.5"],
            "RecordTTL": 300
        }))
        .unwrap();

        assert_eq!(ep.dns_name, "new.example.com");
        assert_eq!(ep.targets, vec!["10.0.0.5".to_string()]);
        assert_eq!(ep.record_ttl, Some(300));
        assert!(ep.record_type.is_empty());
    }

    #[test]
    fn test_lowercase_keys() {
        let changes: Changes = serde_json::from_value(json!({
            "create": [{
                "dnsname": "a.lan",
                "targets": ["10.0.0.1"],
                "recordtype": "A",
                "recordttl": 60,
                "setidentifier": "blue",
                "providerspecific": [{"name": "k", "value": "v"}]
            }],
            "updateold": [{"dnsname": "b.lan"}],
            "updatenew": [{"dnsname": "b.lan"}],
            "delete": [{"dnsname": "c.lan"}]
        }))
        .unwrap();

        let ep = &changes.create[0];
        assert_eq!(ep.dns_name, "a.lan");
        assert_eq!(ep.record_type, "A");
        assert_eq!(ep.record_ttl, Some(60));
        assert_eq!(ep.set_identifier, "blue");
        assert_eq!(ep.provider_specific.len(), 1);
        assert_eq!(changes.update_old[0].dns_name, "b.lan");
        assert_eq!(changes.update_new[0].dns_name, "b.lan");
        assert_eq!(changes.delete[0].dns_name, "c.lan");
    }

    #[test]
    fn test_endpoint_null_collections() {
        let ep: Endpoint = serde_json::from_value(json!({
            "dnsName": "a.example.com",
            "targets": null,
            "labels": null,
            "providerSpecific": null
        }))
        .unwrap();

        assert!(ep.targets.is_empty());
        assert!(ep.labels.is_empty());
        assert!(ep.provider_specific.is_empty());
    }

    #[test]
    fn test_endpoint_preserves_optional_fields() {
        let input = json!([{
            "dnsName": "test.example.com",
            "recordType": "A",
            "targets": ["192.168.1.1", "192.168.1.2"],
            "recordTTL": 300,
            "setIdentifier": "blue",
            "labels": {"owner": "default"},
            "providerSpecific": [{"name": "alias", "value": "false"}]
        }]);

        let endpoints: Vec<Endpoint> = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(endpoints[0].set_identifier, "blue");
        assert_eq!(endpoints[0].labels.get("owner").map(String::as_str), Some("default"));
        assert_eq!(serde_json::to_value(&endpoints).unwrap(), input);
    }

    #[test]
    fn test_changes_round_trip_all_lists() {
        let changes = Changes {
            create: vec![Endpoint::a_record("create.example.com", "192.168.1.1")],
            update_old: vec![Endpoint::a_record("update.example.com", "192.168.1.2")],
            update_new: vec![Endpoint::a_record("update.example.com", "192.168.1.3")],
            delete: vec![Endpoint::a_record("delete.example.com", "192.168.1.4")],
        };

        let data = serde_json::to_vec(&changes).unwrap();
        let decoded: Changes = serde_json::from_slice(&data).unwrap();

        assert_eq!(decoded, changes);
        assert!(decoded.has_updates());
    }

    #[test]
    fn test_changes_missing_and_null_lists() {
        let changes: Changes = serde_json::from_str(
            r#"{"Create":[{"DNSName":"new.example.com","Targets":["10.0.0.5"]}],"UpdateOld":null}"#,
        )
        .unwrap();

        assert_eq!(changes.create.len(), 1);
        assert_eq!(changes.create[0].first_target(), Some("10.0.0.5"));
        assert!(changes.update_old.is_empty());
        assert!(changes.delete.is_empty());
        assert!(!changes.has_updates());
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode::<Changes>(b"invalid json").unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)));

        let err = decode::<Vec<Endpoint>>(b"").unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)));
    }

    #[test]
    fn test_unrestricted_domain_filter_is_empty_object() {
        let encoded = serde_json::to_string(&DomainFilter::unrestricted()).unwrap();
        assert_eq!(encoded, "{}");

        let decoded: DomainFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded, DomainFilter::default());
    }
}
