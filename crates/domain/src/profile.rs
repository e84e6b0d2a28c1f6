//! Profile: the per-tenant policy overlay referenced by every device.
//!
//! Built on top of the existing `Group` identity (`group_id`) — a profile
//! carries the access/filter/rate-limit policy a `Group` didn't have room
//! for, kept separate so the group CRUD surface and the query-time policy
//! snapshot can evolve independently, as recommended for the "cyclic
//! references (profile ↔ device)" design note: profiles and devices only
//! ever reference each other by id, never by pointer.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Per-profile access policy: evaluated by the access middleware after the
/// global tier, once a profile has been attached to the request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccessPolicy {
    pub blocked_hosts: HashSet<Arc<str>>,
    pub blocked_subnets: Vec<Arc<str>>,
}

/// Per-profile filter configuration: which lists apply, plus toggles for
/// the hash-prefix stages and this profile's custom rewrites.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterPolicy {
    pub enabled_list_ids: Vec<Arc<str>>,
    pub safe_browsing_enabled: bool,
    pub parental_enabled: bool,
    pub newly_registered_domains_enabled: bool,
    /// Exact-match domain -> rewrite target (CNAME or literal IP).
    pub custom_rewrites: Vec<CustomRewrite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRewrite {
    pub domain: Arc<str>,
    pub target: Arc<str>,
}

/// Per-profile token-bucket override. `None` fields fall back to the
/// server-wide `RateLimitConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RateLimitOverride {
    pub capacity: Option<u32>,
    pub refill_per_sec: Option<u32>,
}

/// Profile: shared, immutable after load. Replacement is whole-snapshot —
/// see `ProfileDb`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub group_id: i64,
    pub access: AccessPolicy,
    pub filter: FilterPolicy,
    pub rate_limit: RateLimitOverride,
    /// Server-name a client can present (TLS SNI or DoH `Host`) to be
    /// identified as this profile directly, independent of any device.
    /// Matched by the device-finder's "custom domain" channel.
    pub custom_domain: Option<Arc<str>>,
}

impl Profile {
    pub fn new(id: i64, group_id: i64) -> Self {
        Self {
            id,
            group_id,
            access: AccessPolicy::default(),
            filter: FilterPolicy::default(),
            rate_limit: RateLimitOverride::default(),
            custom_domain: None,
        }
    }
}

/// Immutable snapshot of every profile, keyed by id, published atomically
/// by the repository layer (`arc_swap::ArcSwap<ProfileDb>` at the call
/// site). Invariant: every device's `profile_id` resolves here; every
/// profile referenced by a device exists in the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProfileDb {
    by_id: std::collections::HashMap<i64, Arc<Profile>>,
    by_custom_domain: std::collections::HashMap<Arc<str>, Arc<Profile>>,
}

impl ProfileDb {
    pub fn new(profiles: Vec<Profile>) -> Self {
        let mut by_id = std::collections::HashMap::new();
        let mut by_custom_domain = std::collections::HashMap::new();
        for profile in profiles {
            let profile = Arc::new(profile);
            if let Some(domain) = &profile.custom_domain {
                by_custom_domain.insert(domain.clone(), profile.clone());
            }
            by_id.insert(profile.id, profile);
        }
        Self { by_id, by_custom_domain }
    }

    pub fn get(&self, id: i64) -> Option<Arc<Profile>> {
        self.by_id.get(&id).cloned()
    }

    pub fn by_custom_domain(&self, domain: &str) -> Option<Arc<Profile>> {
        self.by_custom_domain.get(domain).cloned()
    }

    /// Every profile in the snapshot, used by the composition root to seed
    /// per-profile access policy on startup and reload.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Profile>> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_db_roundtrip() {
        let db = ProfileDb::new(vec![Profile::new(1, 10), Profile::new(2, 20)]);
        assert_eq!(db.len(), 2);
        assert_eq!(db.get(1).unwrap().group_id, 10);
        assert!(db.get(99).is_none());
    }
}
