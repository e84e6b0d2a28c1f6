use std::net::IpAddr;
use std::sync::Arc;

/// Result of a GeoIP lookup. Fields are independently optional because the
/// country and ASN databases are loaded (and can fail to load) separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoIpLookup {
    pub country: Option<Arc<str>>,
    pub asn: Option<u32>,
    pub subdivision: Option<Arc<str>>,
}

/// Maps a client IP to its approximate location, used to annotate billstat
/// records and to drive country-scoped filter rules. Hot-reloaded from disk;
/// callers never see a torn database, only the pre- or post-reload snapshot.
pub trait GeoIpPort: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> GeoIpLookup;
}
