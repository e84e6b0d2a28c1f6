use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use bastion_dns_domain::{DomainError, QueryLog, QueryStats};

use crate::ports::QueryLogRepository;

/// How many rows back the dashboard aggregates look at. Matches the sample
/// size the cache-stats handler already used before stats had a real
/// backing use case.
const AGGREGATE_SAMPLE: usize = 100_000;

pub struct GetRecentQueriesUseCase {
    repo: Arc<dyn QueryLogRepository>,
}

impl GetRecentQueriesUseCase {
    pub fn new(repo: Arc<dyn QueryLogRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, limit: usize) -> Result<Vec<QueryLog>, DomainError> {
        self.repo.recent(limit).await
    }
}

pub struct GetQueryStatsUseCase {
    repo: Arc<dyn QueryLogRepository>,
    started_at: Instant,
}

impl GetQueryStatsUseCase {
    pub fn new(repo: Arc<dyn QueryLogRepository>) -> Self {
        Self {
            repo,
            started_at: Instant::now(),
        }
    }

    pub async fn execute(&self) -> Result<QueryStats, DomainError> {
        let queries = self.repo.recent(AGGREGATE_SAMPLE).await?;

        let queries_total = queries.len() as u64;
        let queries_blocked = queries.iter().filter(|q| q.blocked).count() as u64;
        let unique_clients = queries
            .iter()
            .map(|q| q.client_ip)
            .collect::<HashSet<_>>()
            .len() as u64;

        let cache_eligible = queries.iter().filter(|q| !q.blocked).count();
        let cache_hits = queries.iter().filter(|q| q.cache_hit).count();
        let cache_hit_rate = if cache_eligible > 0 {
            (cache_hits as f64 / cache_eligible as f64) * 100.0
        } else {
            0.0
        };

        let avg_query_time_ms = average_response_time(&queries, |_| true);
        let avg_cache_time_ms = average_response_time(&queries, |q| q.cache_hit);
        let avg_upstream_time_ms = average_response_time(&queries, |q| !q.cache_hit && !q.blocked);

        let mut queries_by_type: HashMap<_, u64> = HashMap::new();
        for q in &queries {
            *queries_by_type.entry(q.record_type).or_default() += 1;
        }

        let stats = QueryStats {
            queries_total,
            queries_blocked,
            unique_clients,
            uptime_seconds: self.started_at.elapsed().as_secs(),
            cache_hit_rate,
            avg_query_time_ms,
            avg_cache_time_ms,
            avg_upstream_time_ms,
            queries_by_type: HashMap::new(),
            most_queried_type: None,
            record_type_distribution: Vec::new(),
        }
        .with_analytics(queries_by_type);

        Ok(stats)
    }
}

fn average_response_time(queries: &[QueryLog], filter: impl Fn(&QueryLog) -> bool) -> f64 {
    let samples: Vec<u64> = queries
        .iter()
        .filter(|q| filter(q))
        .filter_map(|q| q.response_time_ms)
        .collect();

    if samples.is_empty() {
        return 0.0;
    }

    samples.iter().sum::<u64>() as f64 / samples.len() as f64
}
