//! Billstat and RuleStat recorders: thread-safe hot-path counters with the
//! same snapshot-and-reset / merge-back-on-failure shape, so a failed
//! upload never loses counts — it just delays them to the next cycle.

use bastion_dns_application::ports::{BillstatRecorderPort, RuleStatRecorderPort};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-(profile, list) block counters.
#[derive(Default)]
pub struct RuleStatRecorder {
    counters: DashMap<(i64, String), AtomicU64>,
}

impl RuleStatRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStatRecorderPort for RuleStatRecorder {
    fn record_block(&self, profile_id: i64, list_id: &str) {
        self.counters
            .entry((profile_id, list_id.to_string()))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot_and_reset(&self) -> HashMap<(i64, String), u64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().swap(0, Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    fn merge_back(&self, counts: HashMap<(i64, String), u64>) {
        for (key, count) in counts {
            self.counters
                .entry(key)
                .or_insert_with(|| AtomicU64::new(0))
                .fetch_add(count, Ordering::Relaxed);
        }
    }
}

/// Per-device query count + byte total. Country/ASN/protocol are attached
/// at upload time from the billstat record's own fields, not tracked here —
/// this recorder only owns the two numbers that accumulate under
/// concurrent access.
#[derive(Default)]
struct DeviceCounters {
    queries: AtomicU64,
    bytes: AtomicU64,
}

#[derive(Default)]
pub struct BillstatRecorder {
    counters: DashMap<String, DeviceCounters>,
}

impl BillstatRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BillstatRecorderPort for BillstatRecorder {
    fn record_query(&self, device_id: &str, bytes: u64) {
        let entry = self.counters.entry(device_id.to_string()).or_default();
        entry.queries.fetch_add(1, Ordering::Relaxed);
        entry.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    fn snapshot_and_reset(&self) -> HashMap<String, (u64, u64)> {
        self.counters
            .iter()
            .map(|entry| {
                let queries = entry.value().queries.swap(0, Ordering::Relaxed);
                let bytes = entry.value().bytes.swap(0, Ordering::Relaxed);
                (entry.key().clone(), (queries, bytes))
            })
            .filter(|(_, (queries, _))| *queries > 0)
            .collect()
    }

    fn merge_back(&self, counts: HashMap<String, (u64, u64)>) {
        for (device_id, (queries, bytes)) in counts {
            let entry = self.counters.entry(device_id).or_default();
            entry.queries.fetch_add(queries, Ordering::Relaxed);
            entry.bytes.fetch_add(bytes, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_stat_snapshot_resets_and_merge_back_restores() {
        let recorder = RuleStatRecorder::new();
        recorder.record_block(1, "ads");
        recorder.record_block(1, "ads");
        recorder.record_block(2, "malware");

        let snapshot = recorder.snapshot_and_reset();
        assert_eq!(snapshot.get(&(1, "ads".to_string())), Some(&2));
        assert!(recorder.snapshot_and_reset().is_empty());

        recorder.merge_back(snapshot);
        recorder.record_block(1, "ads");
        let after_merge = recorder.snapshot_and_reset();
        assert_eq!(after_merge.get(&(1, "ads".to_string())), Some(&3));
    }

    #[test]
    fn bill_stat_counts_queries_and_bytes() {
        let recorder = BillstatRecorder::new();
        recorder.record_query("device-1", 100);
        recorder.record_query("device-1", 50);

        let snapshot = recorder.snapshot_and_reset();
        assert_eq!(snapshot.get("device-1"), Some(&(2, 150)));
    }
}
