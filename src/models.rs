//! Data models for the host analysis pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed-shape record produced by the normalizer from a raw Shodan host record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Allow-listed fields copied from the raw record, keyed by their
    /// original names. Contains a decomposed `location` sub-record when
    /// the raw record carried one.
    pub basic_info: Map<String, Value>,
    /// One entry per element of the raw service list, source order preserved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vulnerabilities: Vec<VulnerabilityEntry>,
    /// Raw last-update timestamp, empty string if absent
    #[serde(default)]
    pub last_update: String,
}

/// One discovered open endpoint (port + protocol) on a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    /// Classified product ("HTTP", "FTP" or "SSH"); absent when no known
    /// protocol sub-structure was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// An identified weakness (e.g. a CVE) associated with a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityEntry {
    pub id: String,
    /// Detail object as reported upstream; may carry `summary` and `cvss`
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

/// Decomposed geolocation sub-record stored under `basic_info["location"]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub country: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}
