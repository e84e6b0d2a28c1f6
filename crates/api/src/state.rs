use bastion_dns_application::use_cases::{
    CreateGroupUseCase, DeleteGroupUseCase, GetBlocklistUseCase, GetGroupsUseCase,
    GetQueryStatsUseCase, GetRecentQueriesUseCase, GetTimelineUseCase, UpdateGroupUseCase,
};
use bastion_dns_domain::Config;
use bastion_dns_infrastructure::dns::cache::DnsCache;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub get_stats: Arc<GetQueryStatsUseCase>,
    pub get_queries: Arc<GetRecentQueriesUseCase>,
    pub get_timeline: Arc<GetTimelineUseCase>,
    pub get_blocklist: Arc<GetBlocklistUseCase>,
    pub get_groups: Arc<GetGroupsUseCase>,
    pub create_group: Arc<CreateGroupUseCase>,
    pub update_group: Arc<UpdateGroupUseCase>,
    pub delete_group: Arc<DeleteGroupUseCase>,
    pub config: Arc<RwLock<Config>>,
    pub cache: Arc<DnsCache>,
}
