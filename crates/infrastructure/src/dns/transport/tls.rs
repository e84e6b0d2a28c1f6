use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

static CLIENT_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
});

/// DNS over TLS transport (RFC 7858), length-prefixed like DNS-over-TCP.
pub struct TlsTransport {
    server_addr: SocketAddr,
    hostname: String,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, hostname: String) -> Self {
        Self {
            server_addr,
            hostname,
        }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let connector = TlsConnector::from(CLIENT_CONFIG.clone());
        let server_name = ServerName::try_from(self.hostname.clone()).map_err(|e| {
            DomainError::UpstreamTlsHandshake(format!("invalid hostname '{}': {}", self.hostname, e))
        })?;

        let tcp = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;

        let mut tls = tokio::time::timeout(timeout, connector.connect(server_name, tcp))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamTlsHandshake(e.to_string()))?;

        let len = message_bytes.len() as u16;
        let mut framed = Vec::with_capacity(2 + message_bytes.len());
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(message_bytes);

        tokio::time::timeout(timeout, tls.write_all(&framed))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;

        let mut len_buf = [0u8; 2];
        tokio::time::timeout(timeout, tls.read_exact(&mut len_buf))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;
        let response_len = u16::from_be_bytes(len_buf) as usize;

        let mut response = vec![0u8; response_len];
        tokio::time::timeout(timeout, tls.read_exact(&mut response))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| DomainError::UpstreamConnectionBreak(e.to_string()))?;

        debug!(server = %self.server_addr, hostname = %self.hostname, bytes = response.len(), "DoT response received");

        Ok(TransportResponse {
            bytes: response,
            protocol_used: "TLS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
