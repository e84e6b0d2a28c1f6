use async_trait::async_trait;
use bastion_dns_application::ports::GroupRepository;
use bastion_dns_domain::{DomainError, Group, GroupStats};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::error;

type GroupRow = (i64, String, i64, Option<String>, i64, String, String);

fn row_to_group(row: GroupRow) -> Group {
    let (id, name, enabled, comment, is_default, created_at, updated_at) = row;
    Group {
        id: Some(id),
        name: Arc::from(name.as_str()),
        enabled: enabled != 0,
        comment: comment.map(|c| Arc::from(c.as_str())),
        is_default: is_default != 0,
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    }
}

pub struct SqliteGroupRepository {
    pool: SqlitePool,
}

impl SqliteGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn create(&self, name: String, comment: Option<String>) -> Result<Group, DomainError> {
        let result = sqlx::query("INSERT INTO groups (name, comment) VALUES (?, ?)")
            .bind(&name)
            .bind(&comment)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    DomainError::InvalidGroupName(format!("group '{}' already exists", name))
                } else {
                    error!(error = %e, "failed to create group");
                    DomainError::DatabaseError(e.to_string())
                }
            })?;

        let id = result.last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::DatabaseError("failed to fetch created group".to_string()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, enabled, comment, is_default, created_at, updated_at
             FROM groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to fetch group");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(row_to_group))
    }

    async fn get_all(&self) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, enabled, comment, is_default, created_at, updated_at
             FROM groups ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list groups");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(row_to_group).collect())
    }

    async fn update(
        &self,
        id: i64,
        name: Option<String>,
        comment: Option<String>,
    ) -> Result<Group, DomainError> {
        if let Some(name) = name {
            sqlx::query("UPDATE groups SET name = ?, updated_at = datetime('now') WHERE id = ?")
                .bind(&name)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if e.to_string().contains("UNIQUE constraint failed") {
                        DomainError::InvalidGroupName(format!("group '{}' already exists", name))
                    } else {
                        DomainError::DatabaseError(e.to_string())
                    }
                })?;
        }

        if let Some(comment) = comment {
            sqlx::query("UPDATE groups SET comment = ?, updated_at = datetime('now') WHERE id = ?")
                .bind(&comment)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(id.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to delete group");
                DomainError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    async fn count_assigned_subnets(&self, id: i64) -> Result<u64, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM client_subnets WHERE group_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(count as u64)
    }

    async fn stats(&self) -> Result<GroupStats, DomainError> {
        let (total, enabled): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(enabled), 0) FROM groups",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let (total_clients,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(GroupStats {
            total_groups: total as u64,
            enabled_groups: enabled as u64,
            disabled_groups: (total - enabled) as u64,
            total_clients: total_clients as u64,
        })
    }
}
