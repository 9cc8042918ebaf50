use serde_json::{Map, Value, json};

use crate::models::{LocationInfo, NormalizedRecord, ServiceEntry, VulnerabilityEntry};

/// Fields worth surfacing to the model. Anything else in the raw record
/// is dropped, never forwarded downstream.
const BASIC_INFO_FIELDS: &[&str] = &[
    "ip_str",
    "ports",
    "hostnames",
    "org",
    "os",
    "isp",
    "domains",
    "vulns",
    "tags",
    "location",
];

/// Normalizes a raw Shodan host record into a fixed-shape record.
///
/// Total function: every missing or oddly-shaped field degrades to an
/// absent value or documented placeholder, it never fails. The raw
/// record shape is owned by the upstream provider, not by us.
pub fn normalize(raw: &Value) -> NormalizedRecord {
    let empty = Map::new();
    let raw_obj = raw.as_object().unwrap_or(&empty);

    let mut basic_info = Map::new();
    for field in BASIC_INFO_FIELDS {
        if let Some(value) = raw_obj.get(*field) {
            basic_info.insert((*field).to_string(), value.clone());
        }
    }

    if let Some(location) = raw_obj.get("location") {
        let decomposed = decompose_location(location);
        basic_info.insert(
            "location".to_string(),
            json!({
                "country": decomposed.country,
                "city": decomposed.city,
                "latitude": decomposed.latitude,
                "longitude": decomposed.longitude,
            }),
        );
    }

    let services = raw_obj
        .get("data")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(classify_service).collect())
        .unwrap_or_default();

    let vulnerabilities = reconcile_vulns(raw_obj.get("vulns"));

    let last_update = raw_obj
        .get("last_update")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    NormalizedRecord {
        basic_info,
        services,
        vulnerabilities,
        last_update,
    }
}

fn decompose_location(location: &Value) -> LocationInfo {
    LocationInfo {
        country: location
            .get("country_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        city: location
            .get("city")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        latitude: location.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
        longitude: location
            .get("longitude")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
    }
}

/// Classifies one raw service entry by its protocol sub-structure.
///
/// Priority is HTTP > FTP > SSH; a service carrying more than one
/// sub-structure is classified by the first match only.
fn classify_service(service: &Value) -> ServiceEntry {
    let mut entry = ServiceEntry {
        port: service.get("port").and_then(Value::as_u64),
        transport: service
            .get("transport")
            .and_then(Value::as_str)
            .map(str::to_string),
        product: None,
        version: None,
        banner: None,
    };

    if let Some(http) = service.get("http") {
        entry.product = Some("HTTP".to_string());
        entry.version = Some(
            service
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        );
        entry.banner = Some(
            http.get("server")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        );
    } else if service.get("ftp").is_some() {
        entry.product = Some("FTP".to_string());
        entry.banner = Some("FTP Server".to_string());
    } else if let Some(ssh) = service.get("ssh") {
        entry.product = Some("SSH".to_string());
        entry.banner = Some(
            ssh.get("banner")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        );
    }

    entry
}

/// Reconciles the two vulnerability shapes the upstream source emits.
///
/// Depending on dataset freshness `vulns` arrives either as a plain
/// array of CVE ids or as a map from id to detail object. Both reduce
/// to the same entry shape; anything else yields an empty list. New
/// shape variants belong here, not in the composer.
fn reconcile_vulns(vulns: Option<&Value>) -> Vec<VulnerabilityEntry> {
    match vulns {
        Some(Value::Array(ids)) => ids
            .iter()
            .filter_map(Value::as_str)
            .map(|id| VulnerabilityEntry {
                id: id.to_string(),
                details: Map::new(),
            })
            .collect(),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(id, details)| VulnerabilityEntry {
                id: id.clone(),
                details: details.as_object().cloned().unwrap_or_default(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
