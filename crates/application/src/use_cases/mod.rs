pub mod blocklist;
pub mod dns;
pub mod groups;
pub mod maintenance;
pub mod stats;
pub mod timeline;

pub use blocklist::GetBlocklistUseCase;
pub use dns::{HandleDnsQueryUseCase, HashPrefixDefaults, QueryOutcome};
pub use groups::{CreateGroupUseCase, DeleteGroupUseCase, GetGroupsUseCase, UpdateGroupUseCase};
pub use maintenance::CleanupOldQueryLogsUseCase;
pub use stats::{GetQueryStatsUseCase, GetRecentQueriesUseCase};
pub use timeline::{Granularity, GetTimelineUseCase, TimelineBucket};
