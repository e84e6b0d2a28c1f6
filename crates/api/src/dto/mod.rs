pub mod blocklist;
pub mod cache;
pub mod group;
pub mod hostname;
pub mod query;
pub mod stats;
pub mod timeline;

pub use blocklist::BlocklistResponse;
pub use cache::{CacheMetricsResponse, CacheStatsResponse};
pub use group::{CreateGroupRequest, GroupResponse, UpdateGroupRequest};
pub use hostname::HostnameResponse;
pub use query::QueryResponse;
pub use stats::StatsResponse;
pub use timeline::{TimelineBucket, TimelineQuery, TimelineResponse};
