use async_trait::async_trait;
use bastion_dns_application::ports::QueryLogRepository;
use bastion_dns_domain::{DomainError, QueryLog, QuerySource, RecordType};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, instrument};

type LogRow = (
    i64,
    String,
    String,
    String,
    i64,
    Option<i64>,
    i64,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
);

fn query_source_to_str(source: QuerySource) -> &'static str {
    match source {
        QuerySource::Client => "client",
        QuerySource::Internal => "internal",
        QuerySource::DnssecValidation => "dnssec_validation",
    }
}

fn query_source_from_str(s: &str) -> QuerySource {
    match s {
        "internal" => QuerySource::Internal,
        "dnssec_validation" => QuerySource::DnssecValidation,
        _ => QuerySource::Client,
    }
}

fn record_type_from_str(s: &str) -> RecordType {
    RecordType::all()
        .iter()
        .copied()
        .find(|rt| rt.to_string() == s)
        .unwrap_or(RecordType::A)
}

fn row_to_log(row: LogRow) -> QueryLog {
    let (
        id,
        domain,
        record_type,
        client_ip,
        blocked,
        response_time_ms,
        cache_hit,
        cache_refresh,
        dnssec_status,
        upstream_server,
        response_status,
        query_source,
        timestamp,
    ) = row;

    QueryLog {
        id: Some(id),
        domain: Arc::from(domain.as_str()),
        record_type: record_type_from_str(&record_type),
        client_ip: client_ip.parse().unwrap_or(IpAddr::from([0, 0, 0, 0])),
        blocked: blocked != 0,
        response_time_ms: response_time_ms.map(|v| v as u64),
        cache_hit: cache_hit != 0,
        cache_refresh: cache_refresh != 0,
        dnssec_status: dnssec_status.and_then(|s| match s.as_str() {
            "secure" => Some("secure"),
            "insecure" => Some("insecure"),
            "bogus" => Some("bogus"),
            _ => None,
        }),
        upstream_server,
        response_status: response_status.and_then(|s| match s.as_str() {
            "NOERROR" => Some("NOERROR"),
            "NXDOMAIN" => Some("NXDOMAIN"),
            "SERVFAIL" => Some("SERVFAIL"),
            "REFUSED" => Some("REFUSED"),
            _ => None,
        }),
        timestamp: Some(timestamp),
        query_source: query_source_from_str(&query_source),
    }
}

/// Backs the per-query audit trail the admin dashboard pages through.
/// Writes land on the dedicated query-log pool (see
/// `infrastructure::database::create_query_log_pool`); reads go through
/// the shared read pool instead, since `QueryEventLogger` never reads.
pub struct SqliteQueryLogRepository {
    pool: SqlitePool,
}

impl SqliteQueryLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryLogRepository for SqliteQueryLogRepository {
    #[instrument(skip(self, entry), fields(domain = %entry.domain))]
    async fn insert(&self, entry: QueryLog) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO query_log
             (domain, record_type, client_ip, blocked, response_time_ms, cache_hit,
              cache_refresh, dnssec_status, upstream_server, response_status, query_source)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.domain.as_ref())
        .bind(entry.record_type.to_string())
        .bind(entry.client_ip.to_string())
        .bind(entry.blocked as i64)
        .bind(entry.response_time_ms.map(|v| v as i64))
        .bind(entry.cache_hit as i64)
        .bind(entry.cache_refresh as i64)
        .bind(entry.dnssec_status)
        .bind(&entry.upstream_server)
        .bind(entry.response_status)
        .bind(query_source_to_str(entry.query_source))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to insert query log entry");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> Result<Vec<QueryLog>, DomainError> {
        let rows = sqlx::query_as::<_, LogRow>(
            "SELECT id, domain, record_type, client_ip, blocked, response_time_ms, cache_hit,
                    cache_refresh, dnssec_status, upstream_server, response_status,
                    query_source, timestamp
             FROM query_log
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to query recent query log entries");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(row_to_log).collect())
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, retention_days: u32) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM query_log WHERE timestamp < datetime('now', '-' || ? || ' days')",
        )
        .bind(retention_days)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to prune query log");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }
}
