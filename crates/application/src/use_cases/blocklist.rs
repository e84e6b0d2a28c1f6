use std::sync::Arc;

use bastion_dns_domain::{BlockedDomain, DomainError};

use crate::ports::BlocklistRepository;

pub struct GetBlocklistUseCase {
    repo: Arc<dyn BlocklistRepository>,
}

impl GetBlocklistUseCase {
    pub fn new(repo: Arc<dyn BlocklistRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<BlockedDomain>, DomainError> {
        self.repo.list().await
    }
}
