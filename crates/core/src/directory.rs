use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entity kinds held by the remote directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Operator-managed user accounts.
    User,
    /// Named bundles of permissions.
    Role,
    /// Individual grantable permissions.
    Permission,
}

impl EntityKind {
    /// Returns a stable label for logs and messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Permission => "permission",
        }
    }

    /// Returns the REST collection segment for this kind.
    #[must_use]
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Role => "roles",
            Self::Permission => "permissions",
        }
    }

    /// Returns the plural label used in operator-facing messages.
    #[must_use]
    pub fn plural(&self) -> &'static str {
        self.path_segment()
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Request/response operations exposed by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryOperation {
    /// Fetch the full collection.
    List,
    /// Submit a draft and receive the stored record.
    Create,
    /// Replace a full record by identifier.
    Update,
    /// Remove a record by identifier.
    Delete,
}

impl DirectoryOperation {
    /// Returns a stable label for logs and messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for DirectoryOperation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Transport or backend failure raised by a directory call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("directory {operation} {entity_kind} failed: {cause}")]
pub struct DirectoryFault {
    /// Operation that failed.
    pub operation: DirectoryOperation,
    /// Entity kind addressed by the call.
    pub entity_kind: EntityKind,
    /// Human-readable failure cause.
    pub cause: String,
}

impl DirectoryFault {
    /// Creates a fault for an operation on an entity kind.
    #[must_use]
    pub fn new(
        operation: DirectoryOperation,
        entity_kind: EntityKind,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            entity_kind,
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryFault, DirectoryOperation, EntityKind};

    #[test]
    fn fault_message_names_operation_and_kind() {
        let fault = DirectoryFault::new(
            DirectoryOperation::Delete,
            EntityKind::Role,
            "status 500",
        );
        assert_eq!(fault.to_string(), "directory delete role failed: status 500");
    }

    #[test]
    fn path_segments_match_rest_layout() {
        assert_eq!(EntityKind::User.path_segment(), "users");
        assert_eq!(EntityKind::Role.path_segment(), "roles");
        assert_eq!(EntityKind::Permission.path_segment(), "permissions");
    }
}
