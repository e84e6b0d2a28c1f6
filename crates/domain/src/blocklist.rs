//! Custom/manual blocklist entries, distinct from the compiled rule-list
//! engine in `bastion_dns_infrastructure::dns::block_filter`.
//!
//! This is the small, user-maintained override list surfaced by the admin
//! API (`GetBlocklistUseCase`) — not the bulk rule-list/hash-prefix
//! machinery that does the actual per-query filtering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDomain {
    pub id: Option<i64>,
    pub domain: String,
    pub added_at: Option<String>,
}

impl BlockedDomain {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            id: None,
            domain: domain.into(),
            added_at: None,
        }
    }
}
