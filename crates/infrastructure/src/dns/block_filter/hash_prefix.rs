//! Hash-prefix category lists (safe-browsing, parental/adult,
//! newly-registered-domain), loaded the same way `compiler.rs` loads
//! external blocklist sources — one HTTP fetch per configured source,
//! newline-delimited plain domains — except each entry is reduced to a
//! truncated SHA-256 prefix rather than kept as a string, since these lists
//! are meant to be looked up by hash rather than shipped as plaintext.
//!
//! Swapped in as one whole `HashPrefixIndex` on reload, mirroring the
//! `ArcSwap<BlockIndex>` pattern in `engine.rs`.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use dashmap::DashSet;
use rustc_hash::FxBuildHasher;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use bastion_dns_application::ports::{HashPrefixCategory, HashPrefixPort};
use bastion_dns_domain::DomainError;

/// First 4 bytes of SHA-256(domain), big-endian. Collisions just mean an
/// occasional false positive against a multi-million-entry list — the same
/// tradeoff `AtomicBloom` makes elsewhere in this module for exact domains.
fn hash_prefix(domain: &str) -> u32 {
    let digest = Sha256::digest(domain.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[derive(Default)]
struct HashPrefixIndex {
    safe_browsing: DashSet<u32, FxBuildHasher>,
    parental: DashSet<u32, FxBuildHasher>,
    newly_registered: DashSet<u32, FxBuildHasher>,
}

impl HashPrefixIndex {
    fn set_for(&self, category: HashPrefixCategory) -> &DashSet<u32, FxBuildHasher> {
        match category {
            HashPrefixCategory::SafeBrowsing => &self.safe_browsing,
            HashPrefixCategory::Parental => &self.parental,
            HashPrefixCategory::NewlyRegistered => &self.newly_registered,
        }
    }
}

pub struct HashPrefixFilter {
    index: ArcSwap<HashPrefixIndex>,
    safe_browsing_url: Option<String>,
    parental_url: Option<String>,
    newly_registered_url: Option<String>,
    http_client: reqwest::Client,
}

impl HashPrefixFilter {
    pub fn new(
        safe_browsing_url: Option<String>,
        parental_url: Option<String>,
        newly_registered_url: Option<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            index: ArcSwap::from_pointee(HashPrefixIndex::default()),
            safe_browsing_url,
            parental_url,
            newly_registered_url,
            http_client,
        }
    }

    async fn fetch_category(client: &reqwest::Client, url: Option<&str>) -> DashSet<u32, FxBuildHasher> {
        let set = DashSet::with_hasher(FxBuildHasher);
        let Some(url) = url else {
            return set;
        };

        let text = match client
            .get(url)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(url, error = %e, "failed to read hash-prefix source body");
                    return set;
                }
            },
            Ok(resp) => {
                warn!(url, status = %resp.status(), "hash-prefix source returned non-success status");
                return set;
            }
            Err(e) => {
                warn!(url, error = %e, "failed to fetch hash-prefix source");
                return set;
            }
        };

        for line in text.lines() {
            let domain = line.trim();
            if domain.is_empty() || domain.starts_with('#') {
                continue;
            }
            set.insert(hash_prefix(&domain.to_ascii_lowercase()));
        }
        set
    }
}

#[async_trait]
impl HashPrefixPort for HashPrefixFilter {
    fn is_listed(&self, domain: &str, category: HashPrefixCategory) -> bool {
        let index = self.index.load();
        index.set_for(category).contains(&hash_prefix(domain))
    }

    /// Fetch every configured source and atomically swap in the new index.
    /// A source with no URL configured just yields an empty set for that
    /// category — `is_listed` then always returns false for it.
    async fn reload(&self) -> Result<(), DomainError> {
        let (safe_browsing, parental, newly_registered) = tokio::join!(
            Self::fetch_category(&self.http_client, self.safe_browsing_url.as_deref()),
            Self::fetch_category(&self.http_client, self.parental_url.as_deref()),
            Self::fetch_category(&self.http_client, self.newly_registered_url.as_deref()),
        );

        info!(
            safe_browsing = safe_browsing.len(),
            parental = parental.len(),
            newly_registered = newly_registered.len(),
            "Hash-prefix lists compiled"
        );

        self.index.store(Arc::new(HashPrefixIndex {
            safe_browsing,
            parental,
            newly_registered,
        }));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_category_never_matches() {
        let filter = HashPrefixFilter::new(None, None, None, reqwest::Client::new());
        assert!(!filter.is_listed("malware.example", HashPrefixCategory::SafeBrowsing));
    }

    #[test]
    fn prefix_lookup_matches_after_manual_insert() {
        let filter = HashPrefixFilter::new(None, None, None, reqwest::Client::new());
        let index = HashPrefixIndex::default();
        index.safe_browsing.insert(hash_prefix("malware.example"));
        filter.index.store(Arc::new(index));
        assert!(filter.is_listed("malware.example", HashPrefixCategory::SafeBrowsing));
        assert!(!filter.is_listed("benign.example", HashPrefixCategory::SafeBrowsing));
    }
}
