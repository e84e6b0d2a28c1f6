//! DeviceFinder: resolves a request's device/profile by trying each
//! identification channel in a fixed order and stopping at the first hit.
//!
//! `DeviceDb`/`ProfileDb` snapshots are owned by an `ArcSwap` at the call
//! site (the composition root re-publishes them whenever a reload job
//! refreshes devices or profiles) so `identify` never blocks on I/O.

use arc_swap::ArcSwap;
use bastion_dns_application::ports::{DeviceFinderPort, Identification, IdentificationChannel};
use bastion_dns_domain::{Device, DeviceDb, DnsRequestContext, ProfileDb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Counters for the device-finder's non-fatal edge cases — surfaced to the
/// admin API the same way `RuleStatRecorder`/`BillstatRecorder` surface
/// their counts, just without the snapshot-and-reset upload cycle since
/// nothing downstream consumes these on a schedule yet.
#[derive(Default)]
pub struct DeviceFinderMetrics {
    custom_domain_mismatches: AtomicU64,
    human_id_provisioned: AtomicU64,
}

impl DeviceFinderMetrics {
    pub fn custom_domain_mismatches(&self) -> u64 {
        self.custom_domain_mismatches.load(Ordering::Relaxed)
    }

    pub fn human_id_provisioned(&self) -> u64 {
        self.human_id_provisioned.load(Ordering::Relaxed)
    }
}

pub struct DeviceFinderAdapter {
    devices: ArcSwap<DeviceDb>,
    profiles: ArcSwap<ProfileDb>,
    /// Wildcard suffix device IDs are matched against for the DoT/DoQ SNI
    /// channel, e.g. `device-id.dns.example.net` with suffix `dns.example.net`.
    device_domain_suffix: Option<Arc<str>>,
    /// Fire-and-forget persistence for auto-provisioned devices. `identify`
    /// publishes the new device into `devices` itself (lock-free `rcu`, no
    /// I/O) and only hands the row to this channel so it survives a
    /// restart — a dropped send (channel closed, or provisioning disabled)
    /// just means the device re-provisions next startup instead of loading
    /// from the snapshot.
    provisioning: Option<UnboundedSender<Device>>,
    pub metrics: DeviceFinderMetrics,
}

impl DeviceFinderAdapter {
    pub fn new(devices: Arc<DeviceDb>, profiles: Arc<ProfileDb>, device_domain_suffix: Option<Arc<str>>) -> Self {
        Self {
            devices: ArcSwap::from(devices),
            profiles: ArcSwap::from(profiles),
            device_domain_suffix,
            provisioning: None,
            metrics: DeviceFinderMetrics::default(),
        }
    }

    /// Wires a sender that receives every auto-provisioned device so the
    /// composition root can persist it to SQLite off the hot path.
    pub fn with_provisioning(mut self, sender: UnboundedSender<Device>) -> Self {
        self.provisioning = Some(sender);
        self
    }

    pub fn reload_devices(&self, devices: Arc<DeviceDb>) {
        self.devices.store(devices);
    }

    pub fn reload_profiles(&self, profiles: Arc<ProfileDb>) {
        self.profiles.store(profiles);
    }

    fn device_id_from_sni(&self, sni: &str) -> Option<&str> {
        let suffix = self.device_domain_suffix.as_deref()?;
        let stripped = sni.strip_suffix(suffix)?.strip_suffix('.')?;
        if stripped.is_empty() || stripped.contains('.') {
            None
        } else {
            Some(stripped)
        }
    }

    /// `<profile-id>.<human-id>.<device-domain-suffix>` — the two-label form
    /// channel 6 provisions from. Distinguished from the single-label
    /// channel-3 form by the dot `device_id_from_sni` rejects.
    fn human_id_from_sni(&self, sni: &str) -> Option<(i64, &str)> {
        let suffix = self.device_domain_suffix.as_deref()?;
        let stripped = sni.strip_suffix(suffix)?.strip_suffix('.')?;
        let (profile_part, human_part) = stripped.split_once('.')?;
        if human_part.is_empty() || human_part.contains('.') {
            return None;
        }
        let profile_id: i64 = profile_part.parse().ok()?;
        Some((profile_id, human_part))
    }

    fn provisioned_device_id(profile_id: i64, human_id: &str) -> Arc<str> {
        Arc::from(format!("{profile_id}.{human_id}"))
    }

    /// Creates and publishes a new device for an unclaimed `ProfileID.HumanID`
    /// SNI. Returns `None` if the named profile doesn't exist in the current
    /// snapshot — a typo'd profile id is not an error, just never matches.
    fn auto_provision(&self, profile_id: i64, human_id: &str) -> Option<Arc<Device>> {
        self.profiles.load().get(profile_id)?;

        let device_id = Self::provisioned_device_id(profile_id, human_id);
        let device = Device::new(device_id, human_id, profile_id);

        self.devices.rcu(|old| Arc::new(old.with_device_added(device.clone())));
        self.metrics.human_id_provisioned.fetch_add(1, Ordering::Relaxed);

        if let Some(tx) = &self.provisioning {
            let _ = tx.send(device.clone());
        }

        self.devices.load().get(&device.device_id)
    }

    fn hit(device: Arc<Device>, channel: IdentificationChannel) -> Identification {
        Identification {
            device: Some(device),
            channel,
        }
    }

    fn unidentified() -> Identification {
        Identification {
            device: None,
            channel: IdentificationChannel::Unidentified,
        }
    }
}

impl DeviceFinderPort for DeviceFinderAdapter {
    fn identify(&self, ctx: &DnsRequestContext) -> Identification {
        let devices = self.devices.load();

        // 1. Dedicated server IP.
        if let Some(device) = devices.by_dedicated_ip(ctx.server.local_addr.ip()) {
            return Self::hit(device, IdentificationChannel::DedicatedIp);
        }

        // 2. DoH URL path token, optionally basic-auth gated.
        if let Some(token) = &ctx.doh_path_token {
            if let Some(device) = devices.get(token) {
                if device.auth.enabled {
                    let authorized = ctx
                        .doh_basic_auth
                        .as_ref()
                        .is_some_and(|(_, password)| device.auth.password_hash.as_deref() == Some(password.as_ref()));
                    if authorized {
                        return Self::hit(device, IdentificationChannel::DohBasicAuth);
                    }
                } else {
                    return Self::hit(device, IdentificationChannel::DohDeviceId);
                }
            }
        }

        // 3. DoT/DoQ SNI: `<device-id>.<server-wildcard-domain>`.
        if let Some(sni) = ctx.server.tls_server_name.as_deref() {
            if let Some(device_id) = self.device_id_from_sni(sni) {
                if let Some(device) = devices.get(device_id) {
                    return Self::hit(device, IdentificationChannel::QuerySubdomain);
                }
            }

            // 4. Custom domain registered for a profile. A mismatch against
            // a device already found by another channel is logged, not
            // fatal — but dedicated-IP and DoH/SNI-subdomain above already
            // returned, so reaching here means no device matched yet.
            if let Some(profile) = self.profiles.load().by_custom_domain(sni) {
                self.metrics.custom_domain_mismatches.fetch_add(1, Ordering::Relaxed);
                debug!(profile_id = profile.id, server_name = sni, "matched profile by custom domain");
                return Identification {
                    device: None,
                    channel: IdentificationChannel::TlsServerName,
                };
            }

            // 6. `ProfileID.HumanID` subdomain with no existing device at
            // that id: provision one under the named profile instead of
            // falling through to linked-IP/unidentified.
            if let Some((profile_id, human_id)) = self.human_id_from_sni(sni) {
                let device_id = Self::provisioned_device_id(profile_id, human_id);
                if let Some(device) = devices.get(&device_id) {
                    return Self::hit(device, IdentificationChannel::QuerySubdomain);
                }
                if let Some(device) = self.auto_provision(profile_id, human_id) {
                    return Self::hit(device, IdentificationChannel::HumanIdProvisioned);
                }
            }
        }

        // 5. Linked IP.
        if let Some(device) = devices.by_linked_ip(ctx.client_ip()) {
            return Self::hit(device, IdentificationChannel::LinkedIp);
        }

        Self::unidentified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_dns_domain::{Profile, RecordType, RequestId, ServerInfo, TransportKind};
    use std::net::SocketAddr;

    fn ctx_with_sni(sni: &str) -> DnsRequestContext {
        let mut ctx = DnsRequestContext::new(
            RequestId(1),
            SocketAddr::from(([192, 0, 2, 10], 5353)),
            ServerInfo {
                name: "dot".into(),
                group: "dot".into(),
                protocol: TransportKind::Tls,
                local_addr: "10.0.0.1:853".parse().unwrap(),
                tls_server_name: Some(sni.into()),
                requires_identification: false,
            },
            "example.com",
            RecordType::A,
        );
        ctx.tls = Some(Default::default());
        ctx
    }

    #[test]
    fn finds_device_by_sni_subdomain() {
        let device = Device::new("abc123", "phone", 1);
        let finder = DeviceFinderAdapter::new(
            Arc::new(DeviceDb::new(vec![device])),
            Arc::new(ProfileDb::default()),
            Some("dns.example.net".into()),
        );
        let id = finder.identify(&ctx_with_sni("abc123.dns.example.net"));
        assert_eq!(id.channel, IdentificationChannel::QuerySubdomain);
        assert_eq!(id.device.unwrap().device_id.as_ref(), "abc123");
    }

    #[test]
    fn falls_back_to_custom_domain_match() {
        let mut profile = Profile::new(7, 1);
        profile.custom_domain = Some("vpn.example.net".into());
        let finder = DeviceFinderAdapter::new(
            Arc::new(DeviceDb::default()),
            Arc::new(ProfileDb::new(vec![profile])),
            Some("dns.example.net".into()),
        );
        let id = finder.identify(&ctx_with_sni("vpn.example.net"));
        assert_eq!(id.channel, IdentificationChannel::TlsServerName);
        assert!(id.device.is_none());
    }

    #[test]
    fn unidentified_when_nothing_matches() {
        let finder = DeviceFinderAdapter::new(
            Arc::new(DeviceDb::default()),
            Arc::new(ProfileDb::default()),
            None,
        );
        let id = finder.identify(&ctx_with_sni("anything.example.net"));
        assert_eq!(id.channel, IdentificationChannel::Unidentified);
    }

    #[test]
    fn provisions_device_from_human_id_sni() {
        let finder = DeviceFinderAdapter::new(
            Arc::new(DeviceDb::default()),
            Arc::new(ProfileDb::new(vec![Profile::new(7, 1)])),
            Some("dns.example.net".into()),
        );

        let id = finder.identify(&ctx_with_sni("7.kitchen-tablet.dns.example.net"));
        assert_eq!(id.channel, IdentificationChannel::HumanIdProvisioned);
        let device = id.device.unwrap();
        assert_eq!(device.profile_id, 7);
        assert_eq!(device.human_readable_id.as_ref(), "kitchen-tablet");
        assert_eq!(finder.metrics.human_id_provisioned(), 1);

        // Same SNI again finds the now-published device instead of
        // re-provisioning.
        let id2 = finder.identify(&ctx_with_sni("7.kitchen-tablet.dns.example.net"));
        assert_eq!(id2.channel, IdentificationChannel::QuerySubdomain);
        assert_eq!(finder.metrics.human_id_provisioned(), 1);
    }

    #[test]
    fn no_provisioning_for_unknown_profile() {
        let finder = DeviceFinderAdapter::new(
            Arc::new(DeviceDb::default()),
            Arc::new(ProfileDb::default()),
            Some("dns.example.net".into()),
        );
        let id = finder.identify(&ctx_with_sni("99.ghost.dns.example.net"));
        assert_eq!(id.channel, IdentificationChannel::Unidentified);
        assert_eq!(finder.metrics.human_id_provisioned(), 0);
    }
}
