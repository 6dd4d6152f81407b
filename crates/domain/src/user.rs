//! User records and the email shape rule shared by forms and validators.

use rbac_admin_core::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

use crate::DirectoryEntity;

/// Account status shown and edited by operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    /// The account is in use.
    #[default]
    Active,
    /// The account is disabled.
    Inactive,
}

impl UserStatus {
    /// Returns the wire and display value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Returns all selectable statuses.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Active, Self::Inactive]
    }
}

/// A user as stored in the directory.
///
/// `role` holds a role name, not a role identifier. Renaming or deleting a
/// role leaves this value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned identifier.
    pub id: EntityId,
    /// Display name, unique across the directory.
    pub name: String,
    /// Email address, unique across the directory.
    pub email: String,
    /// Name of the assigned role.
    pub role: String,
    /// Account status.
    pub status: UserStatus,
}

/// User payload submitted on create and full replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Name of the assigned role.
    pub role: String,
    /// Account status.
    pub status: UserStatus,
}

impl DirectoryEntity for User {
    type Draft = UserDraft;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            status: self.status,
        }
    }

    fn from_draft(id: EntityId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: draft.status,
        }
    }
}

/// Checks the permissive `local@domain.tld` shape.
///
/// Accepts any value containing a run of non-whitespace characters, an `@`,
/// at least one non-whitespace character, a `.`, and at least one more
/// non-whitespace character. This is a shape hint, not RFC 5322 validation.
#[must_use]
pub fn is_plausible_email(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();

    for (at_index, character) in chars.iter().enumerate() {
        if *character != '@' || at_index == 0 || chars[at_index - 1].is_whitespace() {
            continue;
        }

        let domain = &chars[at_index + 1..];
        for (offset, domain_char) in domain.iter().enumerate() {
            if domain_char.is_whitespace() {
                break;
            }

            let has_label_before = offset > 0;
            let has_label_after = domain
                .get(offset + 1)
                .is_some_and(|next| !next.is_whitespace());
            if *domain_char == '.' && has_label_before && has_label_after {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn simple_address_is_plausible() {
        assert!(is_plausible_email("a@x.com"));
        assert!(is_plausible_email("first.last@sub.example.org"));
    }

    #[test]
    fn address_without_at_is_rejected() {
        assert!(!is_plausible_email("noatsign.example.com"));
    }

    #[test]
    fn address_without_domain_dot_is_rejected() {
        assert!(!is_plausible_email("user@localhost"));
    }

    #[test]
    fn address_with_empty_parts_is_rejected() {
        assert!(!is_plausible_email("@x.com"));
        assert!(!is_plausible_email("user@.com"));
        assert!(!is_plausible_email("user@x."));
        assert!(!is_plausible_email(""));
    }

    #[test]
    fn whitespace_splits_the_shape() {
        assert!(!is_plausible_email("user @x.com"));
        assert!(!is_plausible_email("user@x .com"));
    }

    #[test]
    fn status_uses_capitalized_wire_values() {
        let encoded = serde_json::to_string(&UserStatus::Inactive);
        assert_eq!(encoded.ok().as_deref(), Some("\"Inactive\""));
        assert_eq!(UserStatus::default(), UserStatus::Active);
    }

    #[test]
    fn draft_from_user_keeps_every_field() {
        let user = User {
            id: EntityId::Number(9),
            name: "Ann".to_owned(),
            email: "a@x.com".to_owned(),
            role: "admin".to_owned(),
            status: UserStatus::Inactive,
        };
        let draft = user.to_draft();
        assert_eq!(draft.name, "Ann");
        assert_eq!(draft.email, "a@x.com");
        assert_eq!(draft.role, "admin");
        assert_eq!(draft.status, UserStatus::Inactive);
    }

    proptest! {
        #[test]
        fn values_without_at_are_never_plausible(value in "[^@]*") {
            prop_assert!(!is_plausible_email(&value));
        }

        #[test]
        fn well_formed_addresses_are_plausible(
            local in "[a-z0-9]{1,12}",
            domain in "[a-z0-9]{1,12}",
            tld in "[a-z]{1,6}",
        ) {
            let address = format!("{local}@{domain}.{tld}");
            prop_assert!(is_plausible_email(&address));
        }
    }
}
