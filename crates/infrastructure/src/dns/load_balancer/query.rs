use crate::dns::events::{QueryEvent, QueryEventEmitter};
use crate::dns::forwarding::{DnsResponse, ResponseParser};
use crate::dns::transport;
use bastion_dns_domain::{DnsProtocol, DomainError, RecordType};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct QueryAttemptResult {
    pub response: DnsResponse,
    pub server: SocketAddr,
    pub latency_ms: u64,
}

/// Sends a single pre-built query to one upstream server, honoring the
/// truncation-retry rule: a truncated UDP answer is retried once over TCP
/// to the same server before being treated as a failure.
pub async fn query_server(
    protocol: &DnsProtocol,
    query_bytes: &[u8],
    domain: &str,
    record_type: &RecordType,
    timeout_ms: u64,
    emitter: &QueryEventEmitter,
) -> Result<QueryAttemptResult, DomainError> {
    let timeout = Duration::from_millis(timeout_ms);
    let started = Instant::now();

    let result = send_once(protocol, query_bytes, timeout).await;

    let result = match result {
        Ok((response, _)) if response.truncated && protocol.is_udp() => {
            let tcp_protocol = protocol.as_tcp();
            send_once(&tcp_protocol, query_bytes, timeout).await
        }
        other => other,
    };

    let latency_us = started.elapsed().as_micros() as u64;
    let display = protocol.to_string();

    match &result {
        Ok((response, _)) => emitter.emit(QueryEvent::new(
            domain,
            *record_type,
            display,
            latency_us,
            response.rcode == hickory_proto::op::ResponseCode::NoError,
        )),
        Err(_) => emitter.emit(QueryEvent::new(domain, *record_type, display, latency_us, false)),
    }

    let (response, server) = result?;
    Ok(QueryAttemptResult {
        response,
        server,
        latency_ms: (latency_us / 1000).max(1),
    })
}

async fn send_once(
    protocol: &DnsProtocol,
    query_bytes: &[u8],
    timeout: Duration,
) -> Result<(DnsResponse, SocketAddr), DomainError> {
    let transport = transport::create_transport(protocol)?;
    let raw = transport.send(query_bytes, timeout).await?;
    let response = ResponseParser::parse(&raw.bytes)?;
    let server = protocol
        .socket_addr()
        .unwrap_or_else(|| "0.0.0.0:0".parse().unwrap());
    Ok((response, server))
}
