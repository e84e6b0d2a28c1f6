use bastion_dns_domain::Group;
use serde::{Deserialize, Serialize};

/// Response DTO for group information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub comment: Option<String>,
    pub is_default: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl GroupResponse {
    pub fn from_group(group: Group) -> Self {
        Self {
            id: group.id.unwrap_or(0),
            name: group.name.to_string(),
            enabled: group.enabled,
            comment: group.comment.as_ref().map(|s| s.to_string()),
            is_default: group.is_default,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

/// Request DTO for creating a group
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub comment: Option<String>,
}

/// Request DTO for updating a group
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub comment: Option<String>,
}
