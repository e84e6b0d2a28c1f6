#![allow(dead_code)]

use async_trait::async_trait;
use bastion_dns_application::ports::QueryLogRepository;
use bastion_dns_domain::{DomainError, QueryLog, QuerySource, RecordType};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockQueryLogRepository {
    logs: RwLock<Vec<(QueryLog, i64)>>,
}

fn make_log(client_ip: &str) -> QueryLog {
    QueryLog {
        id: None,
        domain: Arc::from("example.com"),
        record_type: RecordType::A,
        client_ip: client_ip.parse().unwrap(),
        blocked: false,
        response_time_ms: Some(5),
        cache_hit: false,
        cache_refresh: false,
        dnssec_status: None,
        upstream_server: None,
        response_status: Some("NOERROR"),
        timestamp: None,
        query_source: QuerySource::Client,
    }
}

impl MockQueryLogRepository {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(Vec::new()),
        }
    }

    pub async fn add_recent_log(&self, client_ip: &str) {
        self.logs.write().await.push((make_log(client_ip), 0));
    }

    pub async fn add_old_log(&self, client_ip: &str, days_old: i64) {
        self.logs
            .write()
            .await
            .push((make_log(client_ip), days_old));
    }

    pub async fn count(&self) -> usize {
        self.logs.read().await.len()
    }
}

#[async_trait]
impl QueryLogRepository for MockQueryLogRepository {
    async fn insert(&self, entry: QueryLog) -> Result<(), DomainError> {
        self.logs.write().await.push((entry, 0));
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<QueryLog>, DomainError> {
        let logs = self.logs.read().await;
        Ok(logs.iter().take(limit).map(|(l, _)| l.clone()).collect())
    }

    async fn delete_older_than(&self, retention_days: u32) -> Result<u64, DomainError> {
        let mut logs = self.logs.write().await;
        let before = logs.len();
        logs.retain(|(_, age)| (*age as u32) < retention_days);
        Ok((before - logs.len()) as u64)
    }
}
