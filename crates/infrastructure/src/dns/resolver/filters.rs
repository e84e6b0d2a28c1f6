use bastion_dns_domain::{DnsQuery, DomainError, RecordType};

/// Pre-resolution query filters: dropping PTR lookups for private address
/// space (they'd never resolve upstream and just waste a round-trip) and
/// appending a configured local domain to bare hostnames.
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub block_private_ptr: bool,
    pub block_non_fqdn: bool,
    pub local_domain: Option<String>,
}

impl QueryFilters {
    pub fn apply(&self, query: DnsQuery) -> Result<DnsQuery, DomainError> {
        if self.block_private_ptr
            && query.record_type == RecordType::PTR
            && is_private_ptr(&query.domain)
        {
            return Err(DomainError::PolicyDenied);
        }

        if !query.domain.contains('.') {
            if self.block_non_fqdn && self.local_domain.is_none() {
                return Err(DomainError::MalformedRequest);
            }
            if let Some(suffix) = &self.local_domain {
                let qualified = format!("{}.{}", query.domain, suffix);
                return Ok(DnsQuery::new(qualified, query.record_type));
            }
        }

        Ok(query)
    }
}

/// Matches PTR queries for RFC 1918 / loopback / link-local IPv4 space and
/// unique-local / loopback / link-local IPv6 space, addressed via the
/// reverse `in-addr.arpa.` / `ip6.arpa.` zones.
fn is_private_ptr(domain: &str) -> bool {
    let lower = domain.to_ascii_lowercase();

    if let Some(labels) = lower.strip_suffix(".in-addr.arpa.").or_else(|| lower.strip_suffix(".in-addr.arpa")) {
        let octets: Vec<&str> = labels.split('.').collect();
        // in-addr.arpa labels are reversed: "4.3.2.1" means 1.2.3.4
        if octets.len() >= 2 {
            let first: u8 = octets[octets.len() - 1].parse().unwrap_or(255);
            let second: u8 = octets[octets.len() - 2].parse().unwrap_or(255);
            return is_private_v4(first, second);
        }
        return false;
    }

    if let Some(labels) = lower.strip_suffix(".ip6.arpa.").or_else(|| lower.strip_suffix(".ip6.arpa")) {
        let nibbles: Vec<&str> = labels.split('.').collect();
        // nibbles are reversed single hex digits; the last few map to the
        // leading hextet of the address.
        if nibbles.len() >= 4 {
            let leading: String = nibbles[nibbles.len() - 4..]
                .iter()
                .rev()
                .cloned()
                .collect();
            return is_private_v6_prefix(&leading);
        }
        return false;
    }

    false
}

fn is_private_v4(first_octet: u8, second_octet: u8) -> bool {
    match first_octet {
        10 => true,
        127 => true,
        169 if second_octet == 254 => true,
        172 if (16..=31).contains(&second_octet) => true,
        192 if second_octet == 168 => true,
        _ => false,
    }
}

fn is_private_v6_prefix(leading_nibbles: &str) -> bool {
    leading_nibbles.starts_with("fc")
        || leading_nibbles.starts_with("fd")
        || leading_nibbles.starts_with("fe8")
        || leading_nibbles.starts_with("fe9")
        || leading_nibbles.starts_with("fea")
        || leading_nibbles.starts_with("feb")
        || leading_nibbles == "0000"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_rfc1918_ptr() {
        let filters = QueryFilters {
            block_private_ptr: true,
            ..Default::default()
        };
        let query = DnsQuery::new("1.0.168.192.in-addr.arpa.", RecordType::PTR);
        assert!(matches!(
            filters.apply(query),
            Err(DomainError::PolicyDenied)
        ));
    }

    #[test]
    fn allows_public_ptr() {
        let filters = QueryFilters {
            block_private_ptr: true,
            ..Default::default()
        };
        let query = DnsQuery::new("8.8.8.8.in-addr.arpa.", RecordType::PTR);
        assert!(filters.apply(query).is_ok());
    }

    #[test]
    fn appends_local_domain_to_bare_hostname() {
        let filters = QueryFilters {
            local_domain: Some("lan".to_string()),
            ..Default::default()
        };
        let query = DnsQuery::new("printer", RecordType::A);
        let result = filters.apply(query).unwrap();
        assert_eq!(&*result.domain, "printer.lan");
    }

    #[test]
    fn rejects_non_fqdn_without_local_domain() {
        let filters = QueryFilters {
            block_non_fqdn: true,
            ..Default::default()
        };
        let query = DnsQuery::new("printer", RecordType::A);
        assert!(matches!(
            filters.apply(query),
            Err(DomainError::MalformedRequest)
        ));
    }
}
