#![allow(dead_code)]

pub struct DnsFixture {
    pub domain: String,
    pub record_type: String,
}

/// A small fixed set of representative domain/qtype pairs, used to sanity
/// check the wire-format query builder across record types in one sweep.
pub fn load_dns_fixtures() -> Vec<(String, DnsFixture)> {
    [
        ("plain_a", "example.com", "A"),
        ("plain_aaaa", "example.com", "AAAA"),
        ("subdomain_a", "www.example.com", "A"),
        ("mail_mx", "example.com", "MX"),
        ("txt_record", "example.com", "TXT"),
    ]
    .into_iter()
    .map(|(name, domain, record_type)| {
        (
            name.to_string(),
            DnsFixture {
                domain: domain.to_string(),
                record_type: record_type.to_string(),
            },
        )
    })
    .collect()
}
