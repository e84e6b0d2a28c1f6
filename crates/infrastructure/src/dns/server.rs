//! Inbound DNS request handler.
//!
//! Implements `hickory_server::server::RequestHandler`: the one entry point
//! every transport (UDP/TCP/DoT/DoH/DoQ listener) calls into. Runs the
//! initial middleware (request id, CHAOS queries, Android metric domain
//! collapsing, qname lowercasing) itself, then delegates everything else to
//! `HandleDnsQueryUseCase`, then encodes whatever outcome comes back.

use std::iter;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use tracing::{instrument, warn};

use bastion_dns_application::{HandleDnsQueryUseCase, QueryOutcome};
use bastion_dns_domain::{android_metric_domain_replacement, DnsQuery, DnsRequestContext, EcsScope, RequestId, ServerInfo, TransportKind};

use super::forwarding::RecordTypeMapper;

/// Static replies for the two CHAOS-class bind queries every resolver is
/// expected to answer (`dig CH TXT version.bind @server`).
pub struct ChaosReplies {
    pub version: Arc<str>,
    pub hostname: Arc<str>,
}

impl ChaosReplies {
    pub fn new(version: impl Into<Arc<str>>, hostname: impl Into<Arc<str>>) -> Self {
        Self {
            version: version.into(),
            hostname: hostname.into(),
        }
    }
}

/// Controls whether queries get an ECS scope attached for cache
/// partitioning, and at what prefix length the client address is
/// truncated. No EDNS option parsing/relaying — the scope is derived
/// from the query's own source address.
#[derive(Debug, Clone, Copy)]
pub struct EcsPolicy {
    pub enabled: bool,
    pub scope_prefix_v4: u8,
    pub scope_prefix_v6: u8,
}

impl EcsPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            scope_prefix_v4: 24,
            scope_prefix_v6: 56,
        }
    }

    fn scope_for(&self, addr: SocketAddr) -> Option<EcsScope> {
        if !self.enabled {
            return None;
        }
        let prefix = match addr.ip() {
            std::net::IpAddr::V4(_) => self.scope_prefix_v4,
            std::net::IpAddr::V6(_) => self.scope_prefix_v6,
        };
        Some(EcsScope::new(addr.ip(), prefix))
    }
}

/// Implements `RequestHandler`, so it's what gets registered with
/// `hickory_server::ServerFuture` for every listener (UDP, TCP, and — via
/// the transport layer's own listeners — DoT/DoH/DoQ).
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
    server: ServerInfo,
    chaos: ChaosReplies,
    ecs: EcsPolicy,
    next_request_id: AtomicU64,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>, server: ServerInfo, chaos: ChaosReplies, ecs: EcsPolicy) -> Self {
        Self {
            use_case,
            server,
            chaos,
            ecs,
            next_request_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> RequestId {
        RequestId(self.next_request_id.fetch_add(1, Ordering::Relaxed))
    }

    fn set_common_flags(req: &Request, header: &mut Header, rcode: ResponseCode) {
        header.set_message_type(MessageType::Response);
        header.set_op_code(OpCode::Query);
        header.set_response_code(rcode);
        header.set_recursion_desired(req.recursion_desired());
        header.set_recursion_available(true);
        header.set_authoritative(false);
    }

    /// CHAOS-class `version.bind`/`hostname.bind` TXT queries, answered
    /// locally without ever reaching the pipeline.
    async fn handle_chaos<R: ResponseHandler>(&self, req: &Request, mut response: R) -> Option<ResponseInfo> {
        if req.query().query_class() != DNSClass::CH {
            return None;
        }
        let qname = req.query().name().to_string().to_ascii_lowercase();
        let answer = match qname.trim_end_matches('.') {
            "version.bind" => Some(self.chaos.version.clone()),
            "hostname.bind" => Some(self.chaos.hostname.clone()),
            _ => None,
        }?;

        let mut header = *req.header();
        Self::set_common_flags(req, &mut header, ResponseCode::NoError);

        let name = req.query().name().clone().into();
        let record = Record::from_rdata(name, 0, RData::TXT(TXT::new(vec![answer.to_string()])));

        let msg = MessageResponseBuilder::from_message_request(req).build(
            header,
            iter::once(&record),
            iter::empty(),
            iter::empty(),
            iter::empty(),
        );

        Some(
            response
                .send_response(msg)
                .await
                .unwrap_or_else(|_| ResponseInfo::from(*req.header())),
        )
    }

    async fn send_error<R: ResponseHandler>(req: &Request, mut response: R, rcode: ResponseCode) -> ResponseInfo {
        let mut header = *req.header();
        Self::set_common_flags(req, &mut header, rcode);
        let msg = MessageResponseBuilder::from_message_request(req).build(
            header,
            iter::empty(),
            iter::empty(),
            iter::empty(),
            iter::empty(),
        );
        response
            .send_response(msg)
            .await
            .unwrap_or_else(|_| ResponseInfo::from(*req.header()))
    }

    async fn send_records<R: ResponseHandler>(
        req: &Request,
        mut response: R,
        rcode: ResponseCode,
        records: &[Record],
    ) -> ResponseInfo {
        let mut header = *req.header();
        Self::set_common_flags(req, &mut header, rcode);
        let msg = MessageResponseBuilder::from_message_request(req).build(
            header,
            records.iter(),
            iter::empty(),
            iter::empty(),
            iter::empty(),
        );
        response
            .send_response(msg)
            .await
            .unwrap_or_else(|_| ResponseInfo::from(*req.header()))
    }
}

#[async_trait]
impl RequestHandler for DnsServerHandler {
    #[instrument(skip(self, request, response), fields(request_id))]
    async fn handle_request<R: ResponseHandler>(&self, request: &Request, response: R) -> ResponseInfo {
        let request_id = self.next_id();
        tracing::Span::current().record("request_id", request_id.to_string());

        if let Some(info) = self.handle_chaos(request, response.clone()).await {
            return info;
        }

        let hickory_type = request.query().query_type();
        let Some(record_type) = RecordTypeMapper::from_hickory(hickory_type) else {
            return Self::send_error(request, response, ResponseCode::NotImp).await;
        };

        // Android probes an all-zeroes collapsed form of these domains so
        // identical probes from every device share a single cache entry.
        let raw_qname = request.query().name().to_string();
        let qname = {
            let collapsed = android_metric_domain_replacement(&raw_qname);
            if collapsed.is_empty() {
                raw_qname.to_ascii_lowercase()
            } else {
                collapsed
            }
        };

        let remote_addr: SocketAddr = request.src();
        let ctx = DnsRequestContext::new(request_id, remote_addr, self.server.clone(), qname.clone(), record_type);

        let query = DnsQuery::new(qname.trim_end_matches('.').to_string(), record_type)
            .with_ecs(self.ecs.scope_for(remote_addr));

        match self.use_case.execute(&ctx, &query).await {
            Ok(QueryOutcome::Resolved(resolution)) => {
                let Ok(name) = Name::from_str(&raw_qname) else {
                    return Self::send_error(request, response, ResponseCode::ServFail).await;
                };
                let ttl = resolution.min_ttl.unwrap_or(60);
                let records: Vec<Record> = resolution
                    .addresses
                    .iter()
                    .map(|ip| {
                        let rdata = match ip {
                            std::net::IpAddr::V4(v4) => RData::A(A::from(*v4)),
                            std::net::IpAddr::V6(v6) => RData::AAAA(AAAA::from(*v6)),
                        };
                        Record::from_rdata(name.clone(), ttl, rdata)
                    })
                    .collect();
                if records.is_empty() {
                    Self::send_error(request, response, ResponseCode::NXDomain).await
                } else {
                    Self::send_records(request, response, ResponseCode::NoError, &records).await
                }
            }
            Ok(QueryOutcome::Blocked { list_id }) => {
                warn!(domain = %qname, list_id = %list_id, "blocked by filter");
                Self::send_error(request, response, ResponseCode::NXDomain).await
            }
            Ok(QueryOutcome::Denied) => {
                if self.server.protocol == TransportKind::Udp {
                    // Silent drop on UDP: a REFUSED answer confirms to a
                    // scanner that something is listening here.
                    ResponseInfo::from(*request.header())
                } else {
                    Self::send_error(request, response, ResponseCode::Refused).await
                }
            }
            Ok(QueryOutcome::Throttled) => {
                if self.server.protocol.supports_silent_drop() {
                    ResponseInfo::from(*request.header())
                } else {
                    Self::send_error(request, response, ResponseCode::Refused).await
                }
            }
            Ok(QueryOutcome::IdentificationRequired) => {
                Self::send_error(request, response, ResponseCode::Refused).await
            }
            Err(e) => {
                warn!(domain = %qname, error = %e, "query pipeline failed");
                Self::send_error(request, response, ResponseCode::ServFail).await
            }
        }
    }
}
