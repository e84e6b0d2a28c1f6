use async_trait::async_trait;
use bastion_dns_application::ports::BlocklistRepository;
use bastion_dns_domain::{BlockedDomain, DomainError};
use sqlx::SqlitePool;
use tracing::error;

type BlocklistRow = (String, String);

fn row_to_entry(row: BlocklistRow) -> BlockedDomain {
    let (domain, added_at) = row;
    BlockedDomain {
        id: None,
        domain,
        added_at: Some(added_at),
    }
}

/// Backs the small user-maintained `blocklist` table surfaced by the admin
/// dashboard; distinct from the compiled rule-list index
/// `block_filter::BlockFilterEngine` uses for per-query matching.
pub struct SqliteBlocklistRepository {
    pool: SqlitePool,
}

impl SqliteBlocklistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlocklistRepository for SqliteBlocklistRepository {
    async fn list(&self) -> Result<Vec<BlockedDomain>, DomainError> {
        let rows = sqlx::query_as::<_, BlocklistRow>(
            "SELECT domain, added_at FROM blocklist ORDER BY added_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list blocklist entries");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn add(&self, domain: String) -> Result<BlockedDomain, DomainError> {
        sqlx::query("INSERT OR IGNORE INTO blocklist (domain) VALUES (?)")
            .bind(&domain)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to add blocklist entry");
                DomainError::DatabaseError(e.to_string())
            })?;

        let row = sqlx::query_as::<_, BlocklistRow>(
            "SELECT domain, added_at FROM blocklist WHERE domain = ?",
        )
        .bind(&domain)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(row_to_entry(row))
    }

    async fn remove(&self, domain: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM blocklist WHERE domain = ?")
            .bind(domain)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to remove blocklist entry");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }
}
