use std::sync::Arc;

use bastion_dns_domain::DomainError;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::ports::QueryLogRepository;

const AGGREGATE_SAMPLE: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    fn bucket_secs(self) -> i64 {
        match self {
            Granularity::Minute => 60,
            Granularity::Hour => 3600,
            Granularity::Day => 86_400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimelineBucket {
    pub timestamp: String,
    pub total: u64,
    pub blocked: u64,
    pub unblocked: u64,
}

pub struct GetTimelineUseCase {
    repo: Arc<dyn QueryLogRepository>,
}

impl GetTimelineUseCase {
    pub fn new(repo: Arc<dyn QueryLogRepository>) -> Self {
        Self { repo }
    }

    /// `period_hours` bounds how far back to look; `granularity` sets the
    /// bucket width. Rows are pulled once from the recent sample and
    /// bucketed in process — there's no `GROUP BY` repository method since
    /// nothing else in the pipeline needs one.
    pub async fn execute(
        &self,
        period_hours: u32,
        granularity: Granularity,
    ) -> Result<Vec<TimelineBucket>, DomainError> {
        let queries = self.repo.recent(AGGREGATE_SAMPLE).await?;
        let cutoff = Utc::now() - Duration::hours(period_hours as i64);
        let bucket_secs = granularity.bucket_secs();

        let mut buckets: Vec<(i64, u64, u64)> = Vec::new();
        let mut index = std::collections::HashMap::new();

        for q in &queries {
            let Some(ts) = q.timestamp.as_deref().and_then(parse_timestamp) else {
                continue;
            };
            if ts < cutoff {
                continue;
            }

            let bucket_key = ts.timestamp() / bucket_secs;
            let idx = *index.entry(bucket_key).or_insert_with(|| {
                buckets.push((bucket_key, 0, 0));
                buckets.len() - 1
            });

            buckets[idx].1 += 1;
            if q.blocked {
                buckets[idx].2 += 1;
            }
        }

        buckets.sort_by_key(|(key, _, _)| *key);

        Ok(buckets
            .into_iter()
            .map(|(key, total, blocked)| {
                let bucket_start = DateTime::<Utc>::from_timestamp(key * bucket_secs, 0)
                    .unwrap_or_else(Utc::now);
                TimelineBucket {
                    timestamp: bucket_start.to_rfc3339(),
                    total,
                    blocked,
                    unblocked: total - blocked,
                }
            })
            .collect())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc)))
}
