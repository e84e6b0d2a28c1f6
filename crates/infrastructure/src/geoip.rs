//! MaxMind GeoIP2 lookups, behind the same hot-swap pattern the `dns`
//! module uses for block lists and device/profile snapshots: readers are
//! swapped as a whole on reload, never mutated in place, so a lookup in
//! flight always sees one complete generation of the database.

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use maxminddb::{geoip2, Reader};
use tracing::{info, warn};

use bastion_dns_application::ports::{GeoIpLookup, GeoIpPort};

pub struct MaxMindGeoIpAdapter {
    city: ArcSwapOption<Reader<Vec<u8>>>,
    asn: ArcSwapOption<Reader<Vec<u8>>>,
}

impl MaxMindGeoIpAdapter {
    /// Both paths are optional: a deployment may ship only the city or only
    /// the ASN database, or neither (GeoIP annotation then degrades to
    /// always-empty, per `GeoIpPort`'s "hot-reloaded, never errors" contract).
    pub fn new(city_db_path: Option<&Path>, asn_db_path: Option<&Path>) -> Self {
        let adapter = Self {
            city: ArcSwapOption::empty(),
            asn: ArcSwapOption::empty(),
        };
        adapter.reload(city_db_path, asn_db_path);
        adapter
    }

    pub fn reload(&self, city_db_path: Option<&Path>, asn_db_path: Option<&Path>) {
        if let Some(path) = city_db_path {
            match Reader::open_readfile(path) {
                Ok(reader) => {
                    info!(path = %path.display(), "loaded GeoIP city database");
                    self.city.store(Some(Arc::new(reader)));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "failed to load GeoIP city database"),
            }
        }
        if let Some(path) = asn_db_path {
            match Reader::open_readfile(path) {
                Ok(reader) => {
                    info!(path = %path.display(), "loaded GeoIP ASN database");
                    self.asn.store(Some(Arc::new(reader)));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "failed to load GeoIP ASN database"),
            }
        }
    }
}

impl GeoIpPort for MaxMindGeoIpAdapter {
    fn lookup(&self, ip: IpAddr) -> GeoIpLookup {
        let mut result = GeoIpLookup::default();

        if let Some(reader) = self.city.load().as_ref() {
            if let Ok(city) = reader.lookup::<geoip2::City>(ip) {
                result.country = city
                    .country
                    .as_ref()
                    .and_then(|c| c.iso_code)
                    .map(Arc::from);
                result.subdivision = city
                    .subdivisions
                    .as_ref()
                    .and_then(|s| s.first())
                    .and_then(|s| s.iso_code)
                    .map(Arc::from);
            }
        }

        if let Some(reader) = self.asn.load().as_ref() {
            if let Ok(asn) = reader.lookup::<geoip2::Asn>(ip) {
                result.asn = asn.autonomous_system_number;
            }
        }

        result
    }
}
