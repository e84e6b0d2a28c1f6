//! Composition root: loads config, opens the database, wires every
//! DNS-pipeline adapter, then starts the DNS listener, the admin web
//! server, and the background job runner side by side.

mod bootstrap;
mod di;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use bastion_dns_domain::{CliOverrides, ServerInfo, TransportKind};
use bastion_dns_infrastructure::dns::server::{ChaosReplies, DnsServerHandler, EcsPolicy};
use clap::Parser;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "bastion-dns")]
#[command(version)]
#[command(about = "Recursive DNS resolver with filtering, device profiles and an admin API")]
struct Cli {
    /// Path to a TOML config file. Falls back to built-in defaults when absent.
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// DNS server port, overrides the config file.
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Admin web server port, overrides the config file.
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address, overrides the config file.
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// SQLite database path, overrides the config file.
    #[arg(long)]
    database_path: Option<String>,

    /// Log level (trace/debug/info/warn/error), overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        dns_port: cli.dns_port,
        web_port: cli.web_port,
        bind_address: cli.bind,
        config_path: cli.config.clone(),
        database_path: cli.database_path,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Bastion DNS starting");

    let (write_pool, query_log_pool, read_pool) =
        bootstrap::init_database(&config.database.path, &config.database).await?;

    let repos = di::Repositories::build(write_pool.clone(), query_log_pool, read_pool).await?;

    let shutdown = CancellationToken::new();
    let dns_services = di::DnsServices::build(&config, write_pool, &repos, shutdown.clone()).await?;

    let use_cases = di::UseCases::build(&config, &dns_services, &repos, 1);
    let job_runner = di::UseCases::build_job_runner(&config, &dns_services, &repos);

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "bastion-dns".to_string());

    let dns_addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.dns_port).parse()?;
    let server_info = ServerInfo {
        name: Arc::from(hostname.as_str()),
        group: Arc::from("default"),
        protocol: TransportKind::Udp,
        local_addr: dns_addr,
        tls_server_name: None,
        requires_identification: config.dns.require_identification,
    };
    let chaos = ChaosReplies::new(env!("CARGO_PKG_VERSION"), hostname.as_str());
    let ecs_policy = EcsPolicy {
        enabled: config.dns.cache_ecs_enabled,
        scope_prefix_v4: config.dns.cache_ecs_scope_prefix_v4,
        scope_prefix_v6: config.dns.cache_ecs_scope_prefix_v6,
    };
    let dns_handler = DnsServerHandler::new(use_cases.handle_query.clone(), server_info, chaos, ecs_policy);

    let web_addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.web_port).parse()?;
    let config_handle = Arc::new(RwLock::new(config));

    job_runner.start().await;

    let dns_bind = dns_addr.to_string();
    let dns_task = tokio::spawn(async move { server::start_dns_server(dns_bind, dns_handler).await });

    let web_task =
        tokio::spawn(async move { server::start_web_server(web_addr, config_handle, &dns_services, &repos).await });

    info!(dns = %dns_addr, web = %web_addr, "Bastion DNS ready");

    tokio::select! {
        res = dns_task => {
            shutdown.cancel();
            res??;
        }
        res = web_task => {
            shutdown.cancel();
            res??;
        }
    }

    Ok(())
}
