//! Shared primitives for all RBAC admin crates.

#![forbid(unsafe_code)]

/// Directory boundary primitives shared across layers.
pub mod directory;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use directory::{DirectoryFault, DirectoryOperation, EntityKind};

/// Result type used across RBAC admin crates.
pub type AppResult<T> = Result<T, AppError>;

/// Backend-assigned identifier for a directory record.
///
/// The backend owns identifier allocation, so the value is kept opaque and
/// echoed back verbatim in request paths and replacement bodies. Numeric and
/// textual identifiers are both accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Integer identifier, as issued by sequence-backed stores.
    Number(i64),
    /// Textual identifier such as a UUID or document key.
    Text(String),
}

impl EntityId {
    /// Returns the path segment used when addressing this record.
    #[must_use]
    pub fn to_path_segment(&self) -> String {
        self.to_string()
    }

    /// Reads an identifier typed by an operator. Integers become `Number`.
    #[must_use]
    pub fn parse_operator_input(value: &str) -> Self {
        let value = value.trim();
        value
            .parse::<i64>()
            .map_or_else(|_| Self::Text(value.to_owned()), Self::Number)
    }
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Remote directory call failed in transport or returned a non-success status.
    #[error(transparent)]
    Directory(#[from] DirectoryFault),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::EntityId;

    #[test]
    fn entity_id_accepts_numbers_and_text() {
        let numeric: Result<EntityId, _> = serde_json::from_str("42");
        assert_eq!(numeric.ok(), Some(EntityId::Number(42)));

        let textual: Result<EntityId, _> = serde_json::from_str("\"64b7f0c2\"");
        assert_eq!(textual.ok(), Some(EntityId::from("64b7f0c2")));
    }

    #[test]
    fn entity_id_serializes_back_in_original_shape() {
        let numeric = serde_json::to_string(&EntityId::Number(7));
        assert_eq!(numeric.ok().as_deref(), Some("7"));

        let textual = serde_json::to_string(&EntityId::from("abc"));
        assert_eq!(textual.ok().as_deref(), Some("\"abc\""));
    }

    #[test]
    fn operator_input_prefers_numeric_identifiers() {
        assert_eq!(EntityId::parse_operator_input(" 12 "), EntityId::Number(12));
        assert_eq!(
            EntityId::parse_operator_input("role-7"),
            EntityId::from("role-7")
        );
    }

    #[test]
    fn entity_id_formats_as_path_segment() {
        assert_eq!(EntityId::Number(12).to_path_segment(), "12");
        assert_eq!(EntityId::from("role-7").to_path_segment(), "role-7");
    }
}
