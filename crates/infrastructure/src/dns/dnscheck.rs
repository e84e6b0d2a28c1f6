//! DNSCheck: a special check-domain protocol backed by a remote KV store.
//!
//! A client resolves `<random-id>-check.example.local`; this engine
//! recognizes the suffix, validates the id, and stores an info record under
//! it with a TTL. A parallel HTTP endpoint (`/dnscheck/test`) reads the same
//! record back out to confirm the client actually reached this server.

use async_trait::async_trait;
use bastion_dns_application::ports::{DnsCheckPort, KvStorePort};
use bastion_dns_domain::DomainError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Info recorded under a check id, read back by `GET /dnscheck/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInfo {
    pub server_group: Arc<str>,
    pub server_name: Arc<str>,
    pub client_ip: IpAddr,
    pub protocol: Arc<str>,
    pub device_id: Option<Arc<str>>,
    pub profile_id: Option<i64>,
    pub tls_curve: Option<Arc<str>>,
}

/// A random-id label is 4-63 chars from `[A-Za-z0-9-]`.
fn is_valid_check_id(id: &str) -> bool {
    (4..=63).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub struct DnsCheckEngine {
    kv: Arc<dyn KvStorePort>,
    /// Domain suffix a check-domain query ends with, e.g. `-check.example.local`.
    suffix: Arc<str>,
    ttl: Duration,
}

impl DnsCheckEngine {
    pub fn new(kv: Arc<dyn KvStorePort>, suffix: impl Into<Arc<str>>, ttl: Duration) -> Self {
        Self {
            kv,
            suffix: suffix.into(),
            ttl,
        }
    }

    fn extract_id<'a>(&self, qname: &'a str) -> Option<&'a str> {
        let trimmed = qname.trim_end_matches('.');
        let id = trimmed.strip_suffix(self.suffix.as_ref())?;
        is_valid_check_id(id).then_some(id)
    }

    pub fn record_info(&self) -> CheckInfoBuilder {
        CheckInfoBuilder::default()
    }
}

#[async_trait]
impl DnsCheckPort for DnsCheckEngine {
    fn is_check_domain(&self, qname: &str) -> bool {
        self.extract_id(qname).is_some()
    }

    async fn record_check(&self, token: &str, client_ip: IpAddr) -> Result<(), DomainError> {
        let info = CheckInfo {
            server_group: Arc::from(""),
            server_name: Arc::from(""),
            client_ip,
            protocol: Arc::from(""),
            device_id: None,
            profile_id: None,
            tls_curve: None,
        };
        let payload = serde_json::to_string(&info)
            .map_err(|e| DomainError::Internal(format!("failed to serialize check info: {e}")))?;
        self.kv.set(token, &payload, Some(self.ttl)).await
    }

    async fn check_status(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.kv.get(token).await?.is_some())
    }
}

/// Builds a `CheckInfo` from request-time fields the engine itself doesn't
/// see (server identity, transport, device/profile) before handing it to
/// `DnsCheckEngine::store`.
#[derive(Default)]
pub struct CheckInfoBuilder {
    server_group: Arc<str>,
    server_name: Arc<str>,
    protocol: Arc<str>,
    device_id: Option<Arc<str>>,
    profile_id: Option<i64>,
    tls_curve: Option<Arc<str>>,
}

impl CheckInfoBuilder {
    pub fn server(mut self, group: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        self.server_group = group.into();
        self.server_name = name.into();
        self
    }

    pub fn protocol(mut self, protocol: impl Into<Arc<str>>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn device(mut self, device_id: Option<Arc<str>>, profile_id: Option<i64>) -> Self {
        self.device_id = device_id;
        self.profile_id = profile_id;
        self
    }

    pub fn tls_curve(mut self, curve: Option<Arc<str>>) -> Self {
        self.tls_curve = curve;
        self
    }

    pub fn build(self, client_ip: IpAddr) -> CheckInfo {
        CheckInfo {
            server_group: self.server_group,
            server_name: self.server_name,
            client_ip,
            protocol: self.protocol,
            device_id: self.device_id,
            profile_id: self.profile_id,
            tls_curve: self.tls_curve,
        }
    }
}

impl DnsCheckEngine {
    /// Stores a fully-built `CheckInfo` under `token`, used in place of the
    /// port's bare `record_check` when the caller has richer context.
    pub async fn store(&self, token: &str, info: CheckInfo) -> Result<(), DomainError> {
        let payload = serde_json::to_string(&info)
            .map_err(|e| DomainError::Internal(format!("failed to serialize check info: {e}")))?;
        self.kv.set(token, &payload, Some(self.ttl)).await
    }

    pub async fn lookup(&self, token: &str) -> Result<Option<CheckInfo>, DomainError> {
        match self.kv.get(token).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DomainError::Internal(format!("failed to deserialize check info: {e}"))),
            None => Ok(None),
        }
    }
}

/// In-process KV store for dev/test: a `DashMap` with lazily-checked
/// expirations (no background sweep — entries are pruned on access).
#[derive(Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, (String, Option<Instant>)>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStorePort for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.entries.get(key) {
            Some(entry) if entry.1.is_none_or(|expiry| expiry > Instant::now()) => Ok(Some(entry.0.clone())),
            Some(_) => {
                self.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError> {
        self.entries
            .insert(key.to_string(), (value.to_string(), ttl.map(|d| Instant::now() + d)));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Redis-backed KV store using millisecond `PX` TTLs, per spec's remote-KV
/// contract.
pub struct RedisKvStore {
    client: redis::Client,
}

impl RedisKvStore {
    pub fn new(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(|e| DomainError::Internal(format!("invalid redis url: {e}")))?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, DomainError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| DomainError::Internal(format!("redis connection failed: {e}")))
    }
}

#[async_trait]
impl KvStorePort for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        use redis::AsyncCommands;
        let mut conn = self.conn().await?;
        conn.get(key)
            .await
            .map_err(|e| DomainError::Internal(format!("redis GET failed: {e}")))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError> {
        use redis::AsyncCommands;
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) => conn
                .pset_ex::<_, _, ()>(key, value, ttl.as_millis() as u64)
                .await
                .map_err(|e| DomainError::Internal(format!("redis PSETEX failed: {e}"))),
            None => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(|e| DomainError::Internal(format!("redis SET failed: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        use redis::AsyncCommands;
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| DomainError::Internal(format!("redis DEL failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_check_id_charset_and_length() {
        assert!(is_valid_check_id("abcd"));
        assert!(is_valid_check_id("a-b-c-1-2-3"));
        assert!(!is_valid_check_id("abc"));
        assert!(!is_valid_check_id("has_underscore"));
        assert!(!is_valid_check_id(&"a".repeat(64)));
    }

    #[tokio::test]
    async fn recognizes_and_records_check_domain() {
        let kv = Arc::new(MemoryKvStore::new());
        let engine = DnsCheckEngine::new(kv, "-check.example.local", Duration::from_secs(60));

        assert!(engine.is_check_domain("randomid1234-check.example.local."));
        assert!(!engine.is_check_domain("normal.example.com."));

        engine.record_check("randomid1234", "192.0.2.1".parse().unwrap()).await.unwrap();
        assert!(engine.check_status("randomid1234").await.unwrap());
        assert!(!engine.check_status("missing").await.unwrap());
    }

    #[tokio::test]
    async fn memory_kv_store_respects_ttl() {
        let store = MemoryKvStore::new();
        store.set("k", "v", Some(Duration::from_millis(10))).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
