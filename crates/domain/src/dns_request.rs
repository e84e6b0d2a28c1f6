//! Per-query request context.
//!
//! Created once per inbound message, owned by the task handling that
//! message, and dropped when the response is sent. Middlewares attach
//! findings to this context bag as they run; they never mutate the decoded
//! message itself before it reaches the forwarder.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use crate::RecordType;

/// Opaque, monotonically increasing identifier assigned by the initial
/// middleware and threaded through every log line and metric for this
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Transport a query arrived on. Used for metrics labelling and for
/// protocol-specific behaviour (e.g. UDP drop vs TCP REFUSED on rate limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Udp,
    Tcp,
    Tls,
    Https,
    Quic,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Udp => "udp",
            TransportKind::Tcp => "tcp",
            TransportKind::Tls => "dot",
            TransportKind::Https => "doh",
            TransportKind::Quic => "doq",
        }
    }

    /// Whether a dropped (no-reply) response is a valid way to refuse this
    /// transport's query, per the rate-limit middleware's deplete action.
    pub fn supports_silent_drop(&self) -> bool {
        matches!(self, TransportKind::Udp)
    }
}

/// Static information about the listener a query arrived on.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: Arc<str>,
    pub group: Arc<str>,
    pub protocol: TransportKind,
    pub local_addr: SocketAddr,
    /// SNI presented by the client, if this is a TLS-backed transport.
    pub tls_server_name: Option<Arc<str>>,
    /// When true, a request the device-finder can't attach to any device
    /// gets REFUSED instead of proceeding anonymously.
    pub requires_identification: bool,
}

/// Per-request TLS metadata, populated only for DoT/DoH/DoQ.
#[derive(Debug, Clone, Default)]
pub struct TlsInfo {
    pub negotiated_curve: Option<Arc<str>>,
    pub protocol_version: Option<Arc<str>>,
}

/// Query context: created per request, single owner, destroyed on response.
///
/// Mirrors spec's "Query context" data model entry. Device/profile
/// attachment, filter decisions, and cache outcomes are recorded here by
/// each middleware as it runs so later stages (and the post-response
/// billstat/rulestat taps) can read them without re-deriving anything.
#[derive(Debug, Clone)]
pub struct DnsRequestContext {
    pub request_id: RequestId,
    pub remote_addr: SocketAddr,
    pub server: ServerInfo,
    pub tls: Option<TlsInfo>,
    pub received_at: Instant,
    pub qname: Arc<str>,
    pub qtype: RecordType,
    /// Device/profile identifiers, populated by the device-finder middleware.
    pub device_id: Option<Arc<str>>,
    pub profile_id: Option<i64>,
    /// `<device-id>` path segment from a DoH `/<device-id>/dns-query` URL.
    pub doh_path_token: Option<Arc<str>>,
    /// `(username, password)` from a DoH request's basic-auth header.
    pub doh_basic_auth: Option<(Arc<str>, Arc<str>)>,
}

impl DnsRequestContext {
    pub fn new(
        request_id: RequestId,
        remote_addr: SocketAddr,
        server: ServerInfo,
        qname: impl Into<Arc<str>>,
        qtype: RecordType,
    ) -> Self {
        Self {
            request_id,
            remote_addr,
            server,
            tls: None,
            received_at: Instant::now(),
            qname: qname.into(),
            qtype,
            device_id: None,
            profile_id: None,
            doh_path_token: None,
            doh_basic_auth: None,
        }
    }

    /// Client IP in canonical (non-IPv4-mapped) form, per spec's "Query
    /// context" invariant that remote address is always canonicalised.
    pub fn client_ip(&self) -> IpAddr {
        canonicalize(self.remote_addr.ip())
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.received_at.elapsed()
    }
}

/// Un-maps an IPv4-mapped IPv6 address (`::ffff:a.b.c.d`) back to IPv4.
pub fn canonicalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

/// Backwards-compatible alias kept for callers that only need the bag, not
/// its constructor ceremony.
pub type DnsRequest = DnsRequestContext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_v4_mapped_addr() {
        let mapped: IpAddr = "::ffff:192.0.2.1".parse().unwrap();
        assert_eq!(canonicalize(mapped), "192.0.2.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn leaves_plain_v4_and_v6_alone() {
        let v4: IpAddr = "192.0.2.1".parse().unwrap();
        assert_eq!(canonicalize(v4), v4);
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(canonicalize(v6), v6);
    }

    #[test]
    fn request_id_formats_as_hex() {
        assert_eq!(RequestId(255).to_string(), "00000000000000ff");
    }
}
