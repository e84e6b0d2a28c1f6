use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("DNSSEC validation failed: {0}")]
    DnssecValidationFailed(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Query filtered: {0}")]
    FilteredQuery(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Protected group cannot be disabled")]
    ProtectedGroupCannotBeDisabled,

    #[error("Protected group cannot be deleted")]
    ProtectedGroupCannotBeDeleted,

    #[error("Cannot delete group with {0} assigned clients")]
    GroupHasAssignedClients(u64),

    #[error("Invalid group name: {0}")]
    InvalidGroupName(String),

    #[error("Name does not exist")]
    NxDomain,

    #[error("All upstream servers unreachable")]
    TransportAllServersUnreachable,

    #[error("Block filter compilation failed: {0}")]
    BlockFilterCompileError(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Subnet already exists: {0}")]
    SubnetConflict(String),

    #[error("Subnet not found: {0}")]
    SubnetNotFound(String),

    #[error("Request denied by access policy")]
    PolicyDenied,

    #[error("Query blocked by filter: {0}")]
    FilterBlocked(String),

    #[error("Upstream query timed out")]
    UpstreamTimeout,

    #[error("Upstream connection broken: {0}")]
    UpstreamConnectionBreak(String),

    #[error("Upstream TLS handshake failed: {0}")]
    UpstreamTlsHandshake(String),

    #[error("Background refresh failed: {0}")]
    RefresherError(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Transport-layer failures that should not be reported to an error
    /// collector — only sampled as metrics. See forwarder health-check design.
    pub fn is_sampled_only(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamTimeout
                | DomainError::UpstreamConnectionBreak(_)
                | DomainError::TransportAllServersUnreachable
        )
    }
}
