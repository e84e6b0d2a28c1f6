use bastion_dns_domain::{Device, DnsRequestContext};
use std::sync::Arc;

/// How a request was matched to a device. Kept distinct from a bare
/// `Option<Device>` because the channel itself is worth logging — it's the
/// first thing support asks about when a client reports the wrong profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationChannel {
    DedicatedIp,
    LinkedIp,
    DohDeviceId,
    DohBasicAuth,
    TlsServerName,
    QuerySubdomain,
    /// `<profile-id>.<human-id>.<device-domain-suffix>` SNI with no existing
    /// device at that id: a new device is created under the named profile.
    HumanIdProvisioned,
    Unidentified,
}

#[derive(Debug, Clone)]
pub struct Identification {
    pub device: Option<Arc<Device>>,
    pub channel: IdentificationChannel,
}

/// Identifies the device (and therefore the profile) behind a request,
/// trying each channel the transport makes available in a fixed order and
/// stopping at the first match. Falls through to the server's default
/// profile when nothing matches.
pub trait DeviceFinderPort: Send + Sync {
    fn identify(&self, ctx: &DnsRequestContext) -> Identification;
}
