//! Access control: global deny-list plus a per-profile tier, both plain
//! CIDR/host membership checks kept hot-swappable via `ArcSwap` so a reload
//! never blocks a query in flight.

use arc_swap::ArcSwap;
use bastion_dns_application::ports::AccessControlPort;
use bastion_dns_domain::netutil::parse_subnets;
use dashmap::DashMap;
use ipnetwork::IpNetwork;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::warn;

#[derive(Default)]
struct DenyList {
    hosts: HashSet<String>,
    subnets: Vec<IpNetwork>,
}

impl DenyList {
    fn denies(&self, ip: IpAddr, qname: &str) -> bool {
        self.hosts.contains(qname) || self.subnets.iter().any(|n| n.contains(ip))
    }
}

/// Global deny-list reloaded wholesale; per-profile deny-lists are loaded
/// once per profile id and kept until the caller re-registers them (the
/// composition root does so whenever the profile snapshot reloads).
pub struct AccessControlAdapter {
    global: ArcSwap<DenyList>,
    profiles: DashMap<i64, Arc<DenyList>>,
}

impl AccessControlAdapter {
    pub fn new() -> Self {
        Self {
            global: ArcSwap::from_pointee(DenyList::default()),
            profiles: DashMap::new(),
        }
    }

    /// Replace one profile's deny-list. Called by the profile-reload job
    /// whenever `ProfileDb` is refreshed.
    pub fn set_profile_policy(&self, profile_id: i64, hosts: Vec<String>, subnets: Vec<String>) {
        let parsed = match parse_subnets(subnets.iter().map(String::as_str)) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(profile_id, error = %e, "invalid subnet in profile access policy, skipping");
                Vec::new()
            }
        };
        self.profiles.insert(
            profile_id,
            Arc::new(DenyList {
                hosts: hosts.into_iter().collect(),
                subnets: parsed,
            }),
        );
    }
}

impl Default for AccessControlAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessControlPort for AccessControlAdapter {
    fn is_globally_denied(&self, ip: IpAddr) -> bool {
        self.global.load().subnets.iter().any(|n| n.contains(ip))
    }

    fn is_denied_for_profile(&self, profile_id: i64, ip: IpAddr, qname: &str) -> bool {
        self.profiles
            .get(&profile_id)
            .is_some_and(|list| list.denies(ip, qname))
    }

    fn reload(&self, global_hosts: Vec<String>, global_subnets: Vec<String>) {
        let parsed = match parse_subnets(global_subnets.iter().map(String::as_str)) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "invalid subnet in global access policy, keeping previous list");
                return;
            }
        };
        self.global.store(Arc::new(DenyList {
            hosts: global_hosts.into_iter().collect(),
            subnets: parsed,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_host_in_global_list() {
        let adapter = AccessControlAdapter::new();
        adapter.reload(vec!["blocked.example".into()], vec!["10.0.0.0/8".into()]);
        assert!(adapter.is_globally_denied("10.1.2.3".parse().unwrap()));
        assert!(!adapter.is_globally_denied("192.0.2.1".parse().unwrap()));
    }

    #[test]
    fn per_profile_policy_is_independent_of_global() {
        let adapter = AccessControlAdapter::new();
        adapter.set_profile_policy(1, vec!["kids-blocked.example".into()], vec![]);
        assert!(adapter.is_denied_for_profile(1, "192.0.2.1".parse().unwrap(), "kids-blocked.example"));
        assert!(!adapter.is_denied_for_profile(2, "192.0.2.1".parse().unwrap(), "kids-blocked.example"));
    }
}
