use std::sync::Arc;

use bastion_dns_domain::{DomainError, Group, GroupStats};

use crate::ports::GroupRepository;

pub struct GetGroupsUseCase {
    repo: Arc<dyn GroupRepository>,
}

impl GetGroupsUseCase {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<Group>, DomainError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        self.repo.get_by_id(id).await
    }

    pub async fn stats(&self) -> Result<GroupStats, DomainError> {
        self.repo.stats().await
    }
}

pub struct CreateGroupUseCase {
    repo: Arc<dyn GroupRepository>,
}

impl CreateGroupUseCase {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, name: String, comment: Option<String>) -> Result<Group, DomainError> {
        Group::validate_name(&name).map_err(DomainError::InvalidGroupName)?;
        Group::validate_comment(&comment.as_deref().map(Arc::from))
            .map_err(DomainError::InvalidGroupName)?;
        self.repo.create(name, comment).await
    }
}

pub struct UpdateGroupUseCase {
    repo: Arc<dyn GroupRepository>,
}

impl UpdateGroupUseCase {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        id: i64,
        name: Option<String>,
        enabled: Option<bool>,
        comment: Option<String>,
    ) -> Result<Group, DomainError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(id.to_string()))?;

        if let Some(false) = enabled {
            existing
                .can_disable()
                .map_err(|_| DomainError::ProtectedGroupCannotBeDisabled)?;
        }

        if let Some(ref n) = name {
            Group::validate_name(n).map_err(DomainError::InvalidGroupName)?;
        }

        self.repo.update(id, name, comment).await
    }
}

pub struct DeleteGroupUseCase {
    repo: Arc<dyn GroupRepository>,
}

impl DeleteGroupUseCase {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: i64) -> Result<(), DomainError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(id.to_string()))?;

        existing
            .can_delete()
            .map_err(|_| DomainError::ProtectedGroupCannotBeDeleted)?;

        let assigned = self.repo.count_assigned_subnets(id).await?;
        if assigned > 0 {
            return Err(DomainError::GroupHasAssignedClients(assigned));
        }

        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGroupRepo {
        groups: Mutex<Vec<Group>>,
    }

    #[async_trait]
    impl GroupRepository for FakeGroupRepo {
        async fn create(&self, name: String, comment: Option<String>) -> Result<Group, DomainError> {
            let mut groups = self.groups.lock().unwrap();
            let id = groups.len() as i64 + 1;
            let group = Group::new(Some(id), Arc::from(name.as_str()), true, comment.map(|c| Arc::from(c.as_str())), false);
            groups.push(group.clone());
            Ok(group)
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
            Ok(self.groups.lock().unwrap().iter().find(|g| g.id == Some(id)).cloned())
        }

        async fn get_all(&self) -> Result<Vec<Group>, DomainError> {
            Ok(self.groups.lock().unwrap().clone())
        }

        async fn update(
            &self,
            id: i64,
            name: Option<String>,
            comment: Option<String>,
        ) -> Result<Group, DomainError> {
            let mut groups = self.groups.lock().unwrap();
            let group = groups
                .iter_mut()
                .find(|g| g.id == Some(id))
                .ok_or_else(|| DomainError::GroupNotFound(id.to_string()))?;
            if let Some(n) = name {
                group.name = Arc::from(n.as_str());
            }
            if let Some(c) = comment {
                group.comment = Some(Arc::from(c.as_str()));
            }
            Ok(group.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            self.groups.lock().unwrap().retain(|g| g.id != Some(id));
            Ok(())
        }

        async fn count_assigned_subnets(&self, _id: i64) -> Result<u64, DomainError> {
            Ok(0)
        }

        async fn stats(&self) -> Result<GroupStats, DomainError> {
            Ok(GroupStats::default())
        }
    }

    fn repo_with_default() -> Arc<FakeGroupRepo> {
        Arc::new(FakeGroupRepo {
            groups: Mutex::new(vec![Group::new(Some(1), Arc::from("default"), true, None, true)]),
        })
    }

    #[tokio::test]
    async fn create_rejects_invalid_name() {
        let uc = CreateGroupUseCase::new(repo_with_default());
        let err = uc.execute("".to_string(), None).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidGroupName(_)));
    }

    #[tokio::test]
    async fn cannot_disable_default_group() {
        let uc = UpdateGroupUseCase::new(repo_with_default());
        let err = uc.execute(1, None, Some(false), None).await.unwrap_err();
        assert!(matches!(err, DomainError::ProtectedGroupCannotBeDisabled));
    }

    #[tokio::test]
    async fn cannot_delete_default_group() {
        let uc = DeleteGroupUseCase::new(repo_with_default());
        let err = uc.execute(1).await.unwrap_err();
        assert!(matches!(err, DomainError::ProtectedGroupCannotBeDeleted));
    }
}
