//! Loads the whole-snapshot `DeviceDb`/`ProfileDb` pair from SQLite.
//!
//! Both are published as one atomic generation (see `ProfileDb`'s doc
//! comment on the invariant that every device's `profile_id` must resolve
//! in the same snapshot), so there's no per-row repository trait here —
//! just two read-everything loaders the composition root calls on startup
//! and whenever an admin edit needs to republish.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use bastion_dns_domain::{
    AccessPolicy, Device, DeviceDb, DohAuth, FilterPolicy, Profile, ProfileDb, RateLimitOverride,
};
use sqlx::{Row, SqlitePool};
use tracing::{error, warn};

fn parse_ip_array(raw: &str) -> HashSet<IpAddr> {
    serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.parse().ok())
        .collect()
}

pub async fn load_device_db(pool: &SqlitePool) -> Result<DeviceDb, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT device_id, human_readable_id, profile_id, linked_ips, dedicated_ips,
                doh_auth_enabled, doh_password_hash
         FROM devices",
    )
    .fetch_all(pool)
    .await?;

    let devices = rows
        .into_iter()
        .map(|row| {
            let device_id: String = row.get("device_id");
            let human_readable_id: String = row.get("human_readable_id");
            let profile_id: i64 = row.get("profile_id");
            let linked_ips: String = row.get("linked_ips");
            let dedicated_ips: String = row.get("dedicated_ips");
            let doh_auth_enabled: i64 = row.get("doh_auth_enabled");
            let doh_password_hash: Option<String> = row.get("doh_password_hash");

            Device {
                device_id: Arc::from(device_id.as_str()),
                human_readable_id: Arc::from(human_readable_id.as_str()),
                profile_id,
                linked_ips: parse_ip_array(&linked_ips),
                dedicated_ips: parse_ip_array(&dedicated_ips),
                auth: DohAuth {
                    enabled: doh_auth_enabled != 0,
                    password_hash: doh_password_hash.map(|s| Arc::from(s.as_str())),
                },
            }
        })
        .collect();

    Ok(DeviceDb::new(devices))
}

pub async fn load_profile_db(pool: &SqlitePool) -> Result<ProfileDb, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, group_id, access_policy, filter_policy, rate_limit_override, custom_domain
         FROM profiles",
    )
    .fetch_all(pool)
    .await?;

    let profiles = rows
        .into_iter()
        .map(|row| {
            let id: i64 = row.get("id");
            let group_id: i64 = row.get("group_id");
            let access_raw: String = row.get("access_policy");
            let filter_raw: String = row.get("filter_policy");
            let rate_limit_raw: String = row.get("rate_limit_override");
            let custom_domain: Option<String> = row.get("custom_domain");

            let access: AccessPolicy = serde_json::from_str(&access_raw).unwrap_or_else(|e| {
                warn!(profile_id = id, error = %e, "malformed access_policy JSON, using default");
                AccessPolicy::default()
            });
            let filter: FilterPolicy = serde_json::from_str(&filter_raw).unwrap_or_else(|e| {
                warn!(profile_id = id, error = %e, "malformed filter_policy JSON, using default");
                FilterPolicy::default()
            });
            let rate_limit: RateLimitOverride =
                serde_json::from_str(&rate_limit_raw).unwrap_or_else(|e| {
                    warn!(profile_id = id, error = %e, "malformed rate_limit_override JSON, using default");
                    RateLimitOverride::default()
                });

            Profile {
                id,
                group_id,
                access,
                filter,
                rate_limit,
                custom_domain: custom_domain.map(|s| Arc::from(s.as_str())),
            }
        })
        .collect::<Vec<Profile>>();

    if profiles.is_empty() {
        error!("no profiles found in database; every request will fail to resolve a profile");
    }

    Ok(ProfileDb::new(profiles))
}
