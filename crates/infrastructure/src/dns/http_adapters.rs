//! HTTP-backed adapters for the allowlist fetcher and the billstat/rulestat
//! uploaders — the three places spec.md's external-interfaces section
//! describes a plain JSON-over-HTTP contract.

use async_trait::async_trait;
use bastion_dns_application::ports::{AllowlistFetcherPort, StatsUploaderPort};
use bastion_dns_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// GET endpoint returning `[{"Address": "<ip-or-cidr>"}, ...]`. Non-CIDR
/// addresses are promoted to host prefixes by the caller's parser, not here.
#[derive(Debug, Deserialize)]
struct AllowlistEntry {
    #[serde(rename = "Address")]
    address: String,
}

pub struct HttpAllowlistFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpAllowlistFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl AllowlistFetcherPort for HttpAllowlistFetcher {
    async fn fetch(&self) -> Result<Vec<String>, DomainError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("allowlist fetch error for {}: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(DomainError::Internal(format!(
                "allowlist endpoint returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let entries: Vec<AllowlistEntry> = response
            .json()
            .await
            .map_err(|e| DomainError::Internal(format!("allowlist decode error: {e}")))?;
        Ok(entries.into_iter().map(|e| e.address).collect())
    }
}

/// POSTs `{"filters": {"<list-id>": {"<rule>": count, ...}}}`.
pub struct HttpRuleStatUploader {
    client: reqwest::Client,
    url: String,
}

impl HttpRuleStatUploader {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[derive(Serialize)]
struct RuleStatPayload {
    filters: HashMap<String, HashMap<String, u64>>,
}

#[async_trait]
impl StatsUploaderPort<HashMap<(i64, String), u64>> for HttpRuleStatUploader {
    async fn upload(&self, snapshot: HashMap<(i64, String), u64>) -> Result<(), DomainError> {
        let mut filters: HashMap<String, HashMap<String, u64>> = HashMap::new();
        for ((profile_id, list_id), count) in snapshot {
            filters
                .entry(list_id)
                .or_default()
                .insert(profile_id.to_string(), count);
        }
        post_json(&self.client, &self.url, &RuleStatPayload { filters }).await
    }
}

/// POSTs a map keyed by device id, per spec's `Upload(records) -> err`.
pub struct HttpBillstatUploader {
    client: reqwest::Client,
    url: String,
}

impl HttpBillstatUploader {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[derive(Serialize)]
struct BillstatRecord {
    queries: u64,
    bytes: u64,
}

#[async_trait]
impl StatsUploaderPort<HashMap<String, (u64, u64)>> for HttpBillstatUploader {
    async fn upload(&self, snapshot: HashMap<String, (u64, u64)>) -> Result<(), DomainError> {
        let records: HashMap<String, BillstatRecord> = snapshot
            .into_iter()
            .map(|(device_id, (queries, bytes))| (device_id, BillstatRecord { queries, bytes }))
            .collect();
        post_json(&self.client, &self.url, &records).await
    }
}

async fn post_json<T: Serialize + Sync>(client: &reqwest::Client, url: &str, body: &T) -> Result<(), DomainError> {
    let response = client
        .post(url)
        .json(body)
        .timeout(Duration::from_secs(30))
        .send()
        .await
        .map_err(|e| DomainError::Internal(format!("upload error for {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(DomainError::Internal(format!(
            "upload endpoint returned HTTP {}",
            response.status().as_u16()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_stat_payload_groups_by_list_id() {
        let mut snapshot = HashMap::new();
        snapshot.insert((1i64, "ads".to_string()), 5u64);
        snapshot.insert((2i64, "ads".to_string()), 3u64);
        let mut filters: HashMap<String, HashMap<String, u64>> = HashMap::new();
        for ((profile_id, list_id), count) in snapshot {
            filters.entry(list_id).or_default().insert(profile_id.to_string(), count);
        }
        assert_eq!(filters["ads"]["1"], 5);
        assert_eq!(filters["ads"]["2"], 3);
    }
}
