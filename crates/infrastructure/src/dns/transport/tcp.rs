use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP transport (RFC 1035 §4.2.2 length-prefixed framing).
///
/// Used both as a standalone configured upstream and as the TC=1 retry
/// target for a UDP upstream.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| {
                DomainError::UpstreamConnectionBreak(format!(
                    "connect to {}: {}",
                    self.server_addr, e
                ))
            })?;

        let len = message_bytes.len() as u16;
        let mut framed = Vec::with_capacity(2 + message_bytes.len());
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(message_bytes);

        tokio::time::timeout(timeout, stream.write_all(&framed))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;

        let mut len_buf = [0u8; 2];
        tokio::time::timeout(timeout, stream.read_exact(&mut len_buf))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;
        let response_len = u16::from_be_bytes(len_buf) as usize;

        let mut response = vec![0u8; response_len];
        tokio::time::timeout(timeout, stream.read_exact(&mut response))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;

        debug!(server = %self.server_addr, bytes = response.len(), "TCP response received");

        Ok(TransportResponse {
            bytes: response,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
