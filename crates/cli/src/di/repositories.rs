//! Constructs every SQLite-backed repository plus the whole-snapshot
//! device/profile loaders, from the pools `bootstrap::init_database` hands
//! back.

use std::sync::Arc;

use bastion_dns_application::ports::{BlocklistRepository, ClientSubnetRepository, GroupRepository, QueryLogRepository};
use bastion_dns_domain::{DeviceDb, ProfileDb};
use bastion_dns_infrastructure::repositories::{
    load_device_db, load_profile_db, SqliteBlocklistRepository, SqliteClientSubnetRepository,
    SqliteGroupRepository, SqliteQueryLogRepository,
};
use sqlx::SqlitePool;

pub struct Repositories {
    pub groups: Arc<dyn GroupRepository>,
    pub blocklist: Arc<dyn BlocklistRepository>,
    pub query_log: Arc<dyn QueryLogRepository>,
    pub client_subnets: Arc<dyn ClientSubnetRepository>,
    pub devices: Arc<DeviceDb>,
    pub profiles: Arc<ProfileDb>,
}

impl Repositories {
    pub async fn build(
        write_pool: SqlitePool,
        query_log_pool: SqlitePool,
        read_pool: SqlitePool,
    ) -> anyhow::Result<Self> {
        let devices = load_device_db(&read_pool).await?;
        let profiles = load_profile_db(&read_pool).await?;

        Ok(Self {
            groups: Arc::new(SqliteGroupRepository::new(write_pool.clone())),
            blocklist: Arc::new(SqliteBlocklistRepository::new(write_pool.clone())),
            query_log: Arc::new(SqliteQueryLogRepository::new(query_log_pool)),
            client_subnets: Arc::new(SqliteClientSubnetRepository::new(write_pool)),
            devices: Arc::new(devices),
            profiles: Arc::new(profiles),
        })
    }
}
