use std::fmt::Write;

use serde_json::Value;

use crate::models::NormalizedRecord;

/// Composes the analysis prompt handed to the chat backend.
///
/// Deterministic: identical records yield byte-identical output.
/// Sections render in a fixed order; the services and vulnerabilities
/// blocks are omitted entirely when their lists are empty.
pub fn compose(record: &NormalizedRecord) -> String {
    let basic = &record.basic_info;

    let mut prompt = format!(
        "Analyze the following Shodan host data:\n\
\n\
Basic Information:\n\
- IP: {ip}\n\
- Organization: {org}\n\
- ISP: {isp}\n\
- Hostnames: {hostnames}\n\
- Domains: {domains}\n\
- Operating System: {os}\n\
- Last Update: {last_update}\n\
\n\
Location:\n\
- Country: {country}\n\
- City: {city}",
        ip = str_field(basic.get("ip_str")),
        org = str_field(basic.get("org")),
        isp = str_field(basic.get("isp")),
        hostnames = joined_list(basic.get("hostnames")),
        domains = joined_list(basic.get("domains")),
        os = str_field(basic.get("os")),
        last_update = record.last_update,
        country = location_field(basic.get("location"), "country"),
        city = location_field(basic.get("location"), "city"),
    );

    if !record.services.is_empty() {
        prompt.push_str("\n\nOpen Ports and Services:\n");
        for service in &record.services {
            let port = service
                .port
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let transport = service.transport.as_deref().unwrap_or("Unknown");
            let _ = write!(prompt, "\n- Port {} ({}):", port, transport);
            let _ = write!(
                prompt,
                "\n  * Service: {}",
                service.product.as_deref().unwrap_or("None")
            );
            if let Some(version) = &service.version {
                let _ = write!(prompt, "\n  * Version: {}", version);
            }
            if let Some(banner) = &service.banner {
                let _ = write!(prompt, "\n  * Banner: {}", banner);
            }
        }
    }

    if !record.vulnerabilities.is_empty() {
        prompt.push_str("\n\nVulnerabilities:");
        for vuln in &record.vulnerabilities {
            let _ = write!(prompt, "\n- {}", vuln.id);
            if let Some(summary) = vuln.details.get("summary") {
                let _ = write!(prompt, "\n  * Summary: {}", display_value(summary));
            }
            if let Some(cvss) = vuln.details.get("cvss") {
                let _ = write!(prompt, "\n  * CVSS Score: {}", display_value(cvss));
            }
        }
    }

    prompt.push_str("\n\nPlease provide a security analysis of this host, including:");
    prompt.push_str("\n1. Potential security risks and vulnerabilities");
    prompt.push_str("\n2. Recommendations for securing this system");
    prompt.push_str("\n3. Notable patterns or trends in the services and configurations");
    prompt.push_str("\n4. Suggestions for improving the security posture");

    prompt
}

fn str_field(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or("Unknown")
}

/// Joins an array of strings with ", "; absent or empty lists read as "None".
fn joined_list(value: Option<&Value>) -> String {
    let items: Vec<&str> = value
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn location_field<'a>(location: Option<&'a Value>, key: &str) -> &'a str {
    location
        .and_then(|loc| loc.get(key))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
}

/// Renders a detail value without JSON string quoting.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
