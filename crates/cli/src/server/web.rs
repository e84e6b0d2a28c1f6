use std::net::SocketAddr;
use std::sync::Arc;

use bastion_dns_api::{create_api_routes, AppState};
use bastion_dns_application::use_cases::{
    CreateGroupUseCase, DeleteGroupUseCase, GetBlocklistUseCase, GetGroupsUseCase,
    GetQueryStatsUseCase, GetRecentQueriesUseCase, GetTimelineUseCase, UpdateGroupUseCase,
};
use bastion_dns_domain::Config;
use tokio::sync::RwLock;
use tracing::info;

use crate::di::{DnsServices, Repositories};

pub async fn start_web_server(
    bind_addr: SocketAddr,
    config: Arc<RwLock<Config>>,
    dns: &DnsServices,
    repos: &Repositories,
) -> anyhow::Result<()> {
    let state = AppState {
        get_stats: Arc::new(GetQueryStatsUseCase::new(repos.query_log.clone())),
        get_queries: Arc::new(GetRecentQueriesUseCase::new(repos.query_log.clone())),
        get_timeline: Arc::new(GetTimelineUseCase::new(repos.query_log.clone())),
        get_blocklist: Arc::new(GetBlocklistUseCase::new(repos.blocklist.clone())),
        get_groups: Arc::new(GetGroupsUseCase::new(repos.groups.clone())),
        create_group: Arc::new(CreateGroupUseCase::new(repos.groups.clone())),
        update_group: Arc::new(UpdateGroupUseCase::new(repos.groups.clone())),
        delete_group: Arc::new(DeleteGroupUseCase::new(repos.groups.clone())),
        config,
        cache: dns.cache.clone(),
    };

    let app = create_api_routes(state);

    info!(bind_address = %bind_addr, "Starting admin web server");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
