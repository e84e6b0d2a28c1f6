//! Device: shared, immutable after load. Identified by the device-finder
//! middleware through one of six channels (see
//! `bastion_dns_infrastructure::dns::device_finder`).

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DohAuth {
    pub enabled: bool,
    /// Argon2-hashed basic-auth password, checked by the DoH listener.
    pub password_hash: Option<Arc<str>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: Arc<str>,
    pub human_readable_id: Arc<str>,
    pub profile_id: i64,
    pub linked_ips: HashSet<IpAddr>,
    pub dedicated_ips: HashSet<IpAddr>,
    pub auth: DohAuth,
}

impl Device {
    pub fn new(device_id: impl Into<Arc<str>>, human_readable_id: impl Into<Arc<str>>, profile_id: i64) -> Self {
        Self {
            device_id: device_id.into(),
            human_readable_id: human_readable_id.into(),
            profile_id,
            linked_ips: HashSet::new(),
            dedicated_ips: HashSet::new(),
            auth: DohAuth::default(),
        }
    }

    pub fn matches_linked_ip(&self, ip: IpAddr) -> bool {
        self.linked_ips.contains(&ip)
    }

    pub fn matches_dedicated_ip(&self, ip: IpAddr) -> bool {
        self.dedicated_ips.contains(&ip)
    }
}

/// Immutable snapshot of every device, indexed the ways the device-finder
/// needs to look them up: by dedicated IP, by linked IP, and by id.
#[derive(Debug, Clone, Default)]
pub struct DeviceDb {
    by_id: std::collections::HashMap<Arc<str>, Arc<Device>>,
    by_dedicated_ip: std::collections::HashMap<IpAddr, Arc<Device>>,
    by_linked_ip: std::collections::HashMap<IpAddr, Arc<Device>>,
}

impl DeviceDb {
    pub fn new(devices: Vec<Device>) -> Self {
        let mut db = Self::default();
        for device in devices {
            let device = Arc::new(device);
            for ip in &device.dedicated_ips {
                db.by_dedicated_ip.insert(*ip, device.clone());
            }
            for ip in &device.linked_ips {
                db.by_linked_ip.insert(*ip, device.clone());
            }
            db.by_id.insert(device.device_id.clone(), device);
        }
        db
    }

    pub fn get(&self, id: &str) -> Option<Arc<Device>> {
        self.by_id.get(id).cloned()
    }

    pub fn by_dedicated_ip(&self, ip: IpAddr) -> Option<Arc<Device>> {
        self.by_dedicated_ip.get(&ip).cloned()
    }

    pub fn by_linked_ip(&self, ip: IpAddr) -> Option<Arc<Device>> {
        self.by_linked_ip.get(&ip).cloned()
    }

    /// New snapshot with one device added, for the device-finder's
    /// human-readable-id auto-provisioning channel. Whole-snapshot, like
    /// every other DeviceDb/ProfileDb republish — `identify()` only ever
    /// sees a fully-indexed, immutable `DeviceDb`, never a half-updated one.
    pub fn with_device_added(&self, device: Device) -> Self {
        let mut devices: Vec<Device> = self.by_id.values().map(|d| (**d).clone()).collect();
        devices.push(device);
        Self::new(devices)
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
    fn device_db_indexes_by_ip() {
        let mut device = Device::new("dev-1", "my-phone", 1);
        device.linked_ips.insert("192.0.2.1".parse().unwrap());
        let db = DeviceDb::new(vec![device]);
        assert!(db.by_linked_ip("192.0.2.1".parse().unwrap()).is_some());
        assert!(db.by_dedicated_ip("192.0.2.1".parse().unwrap()).is_none());
    }
}
