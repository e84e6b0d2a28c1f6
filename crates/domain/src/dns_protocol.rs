//! Wire protocol and endpoint for a single upstream DNS server.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::errors::DomainError;

/// How to reach one upstream server, and over which transport.
///
/// Parsed from the plain strings configured in `UpstreamPool::servers`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
    Tls { addr: SocketAddr, hostname: String },
    Https { url: String },
    Quic { addr: SocketAddr, hostname: String },
}

impl DnsProtocol {
    /// Socket address for transports that dial a fixed IP:port. `None` for
    /// HTTPS, which resolves its host at request time.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            DnsProtocol::Udp { addr }
            | DnsProtocol::Tcp { addr }
            | DnsProtocol::Tls { addr, .. }
            | DnsProtocol::Quic { addr, .. } => Some(*addr),
            DnsProtocol::Https { .. } => None,
        }
    }

    /// The same endpoint, forced onto TCP. Used for the TC=1 retry.
    pub fn as_tcp(&self) -> DnsProtocol {
        match self {
            DnsProtocol::Udp { addr } => DnsProtocol::Tcp { addr: *addr },
            other => other.clone(),
        }
    }

    pub fn is_udp(&self) -> bool {
        matches!(self, DnsProtocol::Udp { .. })
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "{addr}"),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{addr}"),
            DnsProtocol::Tls { addr, hostname } => write!(f, "tls://{addr}#{hostname}"),
            DnsProtocol::Https { url } => write!(f, "{url}"),
            DnsProtocol::Quic { addr, hostname } => write!(f, "quic://{addr}#{hostname}"),
        }
    }
}

impl FromStr for DnsProtocol {
    type Err = DomainError;

    /// Accepted forms:
    /// - `1.1.1.1:53` → plain UDP (TCP retry on truncation)
    /// - `tcp://1.1.1.1:53` → TCP only
    /// - `tls://1.1.1.1:853#cloudflare-dns.com` → DNS-over-TLS, hostname used for cert verification
    /// - `https://dns.google/dns-query` → DNS-over-HTTPS
    /// - `quic://1.1.1.1:853#cloudflare-dns.com` → DNS-over-QUIC, hostname used for cert verification
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("https://") {
            return Ok(DnsProtocol::Https {
                url: format!("https://{rest}"),
            });
        }
        if let Some(rest) = s.strip_prefix("quic://") {
            let (addr_part, hostname) = rest.split_once('#').ok_or_else(|| {
                DomainError::InvalidDomainName(format!(
                    "DoQ endpoint '{s}' is missing '#hostname' for certificate verification"
                ))
            })?;
            let addr = normalize_addr(addr_part, 853)?;
            return Ok(DnsProtocol::Quic {
                addr,
                hostname: hostname.to_string(),
            });
        }
        if let Some(rest) = s.strip_prefix("tls://") {
            let (addr_part, hostname) = rest.split_once('#').ok_or_else(|| {
                DomainError::InvalidDomainName(format!(
                    "DoT endpoint '{s}' is missing '#hostname' for certificate verification"
                ))
            })?;
            let addr = normalize_addr(addr_part, 853)?;
            return Ok(DnsProtocol::Tls {
                addr,
                hostname: hostname.to_string(),
            });
        }
        if let Some(rest) = s.strip_prefix("tcp://") {
            return Ok(DnsProtocol::Tcp {
                addr: normalize_addr(rest, 53)?,
            });
        }
        Ok(DnsProtocol::Udp {
            addr: normalize_addr(s, 53)?,
        })
    }
}

fn normalize_addr(s: &str, default_port: u16) -> Result<SocketAddr, DomainError> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = s.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }
    Err(DomainError::InvalidDomainName(format!(
        "invalid upstream endpoint '{s}'"
    )))
}
