use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::net::UdpSocket;

/// Small per-destination pool of bound UDP sockets, reused across queries to
/// the same upstream to avoid a bind+connect per lookup.
pub struct UdpSocketPool {
    sockets: DashMap<SocketAddr, Arc<UdpSocket>>,
    max_per_destination: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct PooledSocket {
    socket: Arc<UdpSocket>,
}

impl PooledSocket {
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

impl UdpSocketPool {
    pub fn new(max_per_destination: usize, _max_destinations: usize) -> Self {
        Self {
            sockets: DashMap::new(),
            max_per_destination,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn acquire(&self, dest: SocketAddr) -> std::io::Result<PooledSocket> {
        if let Some(existing) = self.sockets.get(&dest) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(PooledSocket {
                socket: Arc::clone(&existing),
            });
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let bind_addr: SocketAddr = if dest.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };
        let socket = Arc::new(UdpSocket::bind(bind_addr).await?);

        if self.sockets.len() < self.max_per_destination.max(1) * 64 {
            self.sockets.insert(dest, Arc::clone(&socket));
        }

        Ok(PooledSocket { socket })
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
