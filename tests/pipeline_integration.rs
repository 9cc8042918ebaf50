use reconchat::{compose, normalize};
use serde_json::json;

#[test]
fn end_to_end_ssh_host_with_one_vulnerability() {
    let raw = json!({
        "ip_str": "1.2.3.4",
        "org": "Acme",
        "data": [{
            "port": 22,
            "transport": "tcp",
            "ssh": { "banner": "OpenSSH 8.2" }
        }],
        "vulns": ["CVE-2020-1"],
    });

    let record = normalize(&raw);

    assert_eq!(record.services.len(), 1);
    let service = &record.services[0];
    assert_eq!(service.port, Some(22));
    assert_eq!(service.transport.as_deref(), Some("tcp"));
    assert_eq!(service.product.as_deref(), Some("SSH"));
    assert_eq!(service.banner.as_deref(), Some("OpenSSH 8.2"));
    assert!(service.version.is_none());

    assert_eq!(record.vulnerabilities.len(), 1);
    assert_eq!(record.vulnerabilities[0].id, "CVE-2020-1");
    assert!(record.vulnerabilities[0].details.is_empty());

    let prompt = compose(&record);
    assert!(prompt.contains("- IP: 1.2.3.4"));
    assert!(prompt.contains("- Organization: Acme"));
    assert!(prompt.contains("Port 22 (tcp):"));
    assert!(prompt.contains("Port 22 (tcp):\n  * Service: SSH\n  * Banner: OpenSSH 8.2"));
    assert!(prompt.contains("Vulnerabilities:\n- CVE-2020-1"));
    assert!(!prompt.contains("Summary:"));
    assert!(!prompt.contains("CVSS Score:"));
}

#[test]
fn full_record_renders_every_section_in_order() {
    let raw = json!({
        "ip_str": "203.0.113.7",
        "org": "Example Org",
        "isp": "Example ISP",
        "os": "Linux",
        "hostnames": ["web.example"],
        "domains": ["example"],
        "last_update": "2024-03-01T12:00:00",
        "location": {
            "country_name": "DE",
            "city": "Berlin",
            "latitude": 52.52,
            "longitude": 13.40,
        },
        "data": [
            { "port": 80, "transport": "tcp", "http": { "server": "Apache" } },
            { "port": 21, "transport": "tcp", "ftp": {} },
        ],
        "vulns": { "CVE-2019-1": { "summary": "old bug", "cvss": 5.0 } },
    });

    let prompt = compose(&normalize(&raw));

    let basic_at = prompt.find("Basic Information:").expect("basic section");
    let location_at = prompt.find("Location:").expect("location section");
    let services_at = prompt
        .find("Open Ports and Services:")
        .expect("services section");
    let vulns_at = prompt.find("Vulnerabilities:").expect("vulns section");
    let closing_at = prompt
        .find("Please provide a security analysis")
        .expect("closing instruction");
    assert!(basic_at < location_at);
    assert!(location_at < services_at);
    assert!(services_at < vulns_at);
    assert!(vulns_at < closing_at);

    assert!(prompt.contains("- Country: DE"));
    assert!(prompt.contains("- City: Berlin"));
    assert!(prompt.contains("- Port 80 (tcp):\n  * Service: HTTP"));
    assert!(prompt.contains("- Port 21 (tcp):\n  * Service: FTP\n  * Banner: FTP Server"));
    assert!(prompt.contains("- CVE-2019-1\n  * Summary: old bug\n  * CVSS Score: 5.0"));
}

#[test]
fn sparse_record_composes_without_optional_sections() {
    let prompt = compose(&normalize(&json!({ "ip_str": "198.51.100.1" })));

    assert!(prompt.contains("- IP: 198.51.100.1"));
    assert!(prompt.contains("- Organization: Unknown"));
    assert!(prompt.contains("- Hostnames: None"));
    assert!(!prompt.contains("Open Ports and Services:"));
    assert!(!prompt.contains("Vulnerabilities:"));
    assert!(prompt.contains("Please provide a security analysis"));
}
