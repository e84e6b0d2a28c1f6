pub mod blocklist_repository;
pub mod client_subnet_repository;
pub mod group_repository;
pub mod query_log_repository;
pub mod snapshot_loader;

pub use blocklist_repository::SqliteBlocklistRepository;
pub use client_subnet_repository::SqliteClientSubnetRepository;
pub use group_repository::SqliteGroupRepository;
pub use query_log_repository::SqliteQueryLogRepository;
pub use snapshot_loader::{load_device_db, load_profile_db};
