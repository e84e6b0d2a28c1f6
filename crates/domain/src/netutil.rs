//! Subnet/address formatting helpers shared by the rate-limit allowlist and
//! access-policy subnet matchers.

use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// Format `prefix:port`, appending `/prefixlen` only when the prefix is
/// narrower than a single host (i.e. it's a real subnet, not one address).
pub fn format_prefix_addr(prefix: IpNetwork, port: u16) -> String {
    let host_bits = match prefix.ip() {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    if prefix.prefix() == host_bits {
        format!("{}:{}", prefix.ip(), port)
    } else {
        format!("{}:{}/{}", prefix.network(), port, prefix.prefix())
    }
}

/// Parse a mix of bare addresses and CIDR strings into `IpNetwork`s. Bare
/// addresses are promoted to host prefixes (`/32` for IPv4, `/128` for
/// IPv6); already-CIDR strings are parsed as-is.
pub fn parse_subnets<'a, I: IntoIterator<Item = &'a str>>(
    inputs: I,
) -> Result<Vec<IpNetwork>, String> {
    inputs
        .into_iter()
        .map(|s| {
            if s.contains('/') {
                s.parse::<IpNetwork>().map_err(|e| format!("invalid CIDR {s}: {e}"))
            } else {
                let ip: IpAddr = s.parse().map_err(|e| format!("invalid address {s}: {e}"))?;
                Ok(IpNetwork::from(ip))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_prefix_addr_host() {
        let n: IpNetwork = "1.2.3.4/32".parse().unwrap();
        assert_eq!(format_prefix_addr(n, 5678), "1.2.3.4:5678");
    }

    #[test]
    fn format_prefix_addr_subnet() {
        let n: IpNetwork = "1.2.3.0/24".parse().unwrap();
        assert_eq!(format_prefix_addr(n, 5678), "1.2.3.0:5678/24");
    }

    #[test]
    fn parse_subnets_mixed() {
        let parsed = parse_subnets(["1.2.3.4", "10.0.0.0/8"]).unwrap();
        assert_eq!(parsed[0].to_string(), "1.2.3.4/32");
        assert_eq!(parsed[1].to_string(), "10.0.0.0/8");
    }
}
