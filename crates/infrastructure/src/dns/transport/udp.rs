use super::udp_pool::UdpSocketPool;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport with optional socket pooling.
///
/// When a pool is provided, sockets are reused to reduce latency (10-20% improvement).
/// Without a pool, sockets are created per query (legacy behavior).
pub struct UdpTransport {
    server_addr: SocketAddr,
    pool: Option<Arc<UdpSocketPool>>,
}

impl UdpTransport {
    /// Create new UDP transport without pooling (legacy).
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            pool: None,
        }
    }

    /// Create new UDP transport with socket pooling (recommended).
    ///
    /// # Example
    /// ```ignore
    /// let pool = Arc::new(UdpSocketPool::new(8, 100));
    /// let transport = UdpTransport::with_pool(server_addr, pool);
    /// ```
    pub fn with_pool(server_addr: SocketAddr, pool: Arc<UdpSocketPool>) -> Self {
        Self {
            server_addr,
            pool: Some(pool),
        }
    }

    /// Send query using pooled socket (if available) or create new socket.
    async fn send_with_pool(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        if let Some(ref pool) = self.pool {
            // Use pooled socket
            let pooled = pool.acquire(self.server_addr).await.map_err(|e| {
                DomainError::InvalidDomainName(format!("Failed to acquire UDP socket: {}", e))
            })?;

            let socket = pooled.socket();

            // Send query
            let bytes_sent =
                tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
                    .await
                    .map_err(|_| {
                        DomainError::InvalidDomainName(format!(
                            "Timeout sending UDP query to {}",
                            self.server_addr
                        ))
                    })?
                    .map_err(|e| {
                        DomainError::InvalidDomainName(format!(
                            "Failed to send UDP query to {}: {}",
                            self.server_addr, e
                        ))
                    })?;

            debug!(
                server = %self.server_addr,
                bytes_sent = bytes_sent,
                pooled = true,
                "UDP query sent"
            );

            // Receive response
            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

            let (bytes_received, from_addr) =
                tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| {
                        DomainError::InvalidDomainName(format!(
                            "Timeout waiting for UDP response from {}",
                            self.server_addr
                        ))
                    })?
                    .map_err(|e| {
                        DomainError::InvalidDomainName(format!(
                            "Failed to receive UDP response from {}: {}",
                            self.server_addr, e
                        ))
                    })?;

            // Validate response source
            if from_addr.ip() != self.server_addr.ip() {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
            }

            recv_buf.truncate(bytes_received);

            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                pooled = true,
                "UDP response received"
            );

            Ok(TransportResponse {
                bytes: recv_buf,
                protocol_used: "UDP",
            })
        } else {
            // Legacy behavior: create socket per query
            self.send_without_pool(message_bytes, timeout).await
        }
    }

    /// Legacy send without pooling (creates socket per query).
    async fn send_without_pool(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to bind UDP socket: {}", e))
        })?;

        // Send query
        let bytes_sent =
            tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
                .await
                .map_err(|_| {
                    DomainError::InvalidDomainName(format!(
                        "Timeout sending UDP query to {}",
                        self.server_addr
                    ))
                })?
                .map_err(|e| {
                    DomainError::InvalidDomainName(format!(
                        "Failed to send UDP query to {}: {}",
                        self.server_addr, e
                    ))
                })?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            pooled = false,
            "UDP query sent"
        );

        // Receive response
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let (bytes_received, from_addr) =
            tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| {
                    DomainError::InvalidDomainName(format!(
                        "Timeout waiting for UDP response from {}",
                        self.server_addr
                    ))
                })?
                .map_err(|e| {
                    DomainError::InvalidDomainName(format!(
                        "Failed to receive UDP response from {}: {}",
                        self.server_addr, e
                    ))
                })?;

        // Validate response came from expected server
        if from_addr.ip() != self.server_addr.ip() {
            warn!(
                expected = %self.server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(
            server = %self.server_addr,
            bytes_received = bytes_received,
            pooled = false,
            "UDP response received"
        );

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        self.send_with_pool(message_bytes, timeout).await
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
