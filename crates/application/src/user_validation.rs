//! Local validation of user drafts against the most recently fetched users.
//!
//! The check never calls the directory. It trusts the caller's snapshot, so a
//! collision created by another operator after that fetch goes unnoticed here
//! and surfaces, if at all, as a directory fault on submit.

use std::collections::BTreeMap;

use rbac_admin_core::EntityId;
use rbac_admin_domain::{User, UserDraft, is_plausible_email};

/// Validated user form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
    /// The `name` field.
    Name,
    /// The `email` field.
    Email,
    /// The `role` field.
    Role,
}

impl UserField {
    /// Returns the form field name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserViolation {
    /// Name is empty after trimming.
    NameRequired,
    /// Another user already has this name.
    NameTaken,
    /// Email is empty after trimming.
    EmailRequired,
    /// Email does not have the `local@domain.tld` shape.
    EmailInvalid,
    /// Another user already has this email.
    EmailTaken,
    /// No role selected.
    RoleRequired,
    /// The role is not one of the loaded role names.
    RoleUnknown,
}

impl UserViolation {
    /// Returns the operator-facing message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NameRequired => "Name is required",
            Self::NameTaken => "Name is already in use",
            Self::EmailRequired => "Email is required",
            Self::EmailInvalid => "Invalid email format",
            Self::EmailTaken => "Email is already in use",
            Self::RoleRequired => "Role is required",
            Self::RoleUnknown => "Role does not exist",
        }
    }
}

/// Violations keyed by field. Empty means the draft may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: BTreeMap<UserField, UserViolation>,
}

impl ValidationReport {
    /// Returns whether no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violation recorded for a field.
    #[must_use]
    pub fn get(&self, field: UserField) -> Option<UserViolation> {
        self.violations.get(&field).copied()
    }

    /// Iterates violations in field order.
    pub fn iter(&self) -> impl Iterator<Item = (UserField, UserViolation)> + '_ {
        self.violations
            .iter()
            .map(|(field, violation)| (*field, *violation))
    }

    /// Returns the number of fields with a violation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn record(&mut self, field: UserField, violation: UserViolation) {
        self.violations.entry(field).or_insert(violation);
    }
}

/// Validates a user draft against the loaded users.
///
/// Every field is checked; one violation is reported per field, with
/// presence checked before shape and shape before uniqueness. The record
/// identified by `exclude_id` is ignored for uniqueness so that saving an
/// unchanged user does not collide with itself. Name and email uniqueness is
/// exact and case-sensitive on the trimmed draft values.
#[must_use]
pub fn validate_user(
    draft: &UserDraft,
    exclude_id: Option<&EntityId>,
    existing_users: &[User],
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let others = || {
        existing_users
            .iter()
            .filter(move |user| exclude_id != Some(&user.id))
    };

    let name = draft.name.trim();
    if name.is_empty() {
        report.record(UserField::Name, UserViolation::NameRequired);
    } else if others().any(|user| user.name == name) {
        report.record(UserField::Name, UserViolation::NameTaken);
    }

    let email = draft.email.trim();
    if email.is_empty() {
        report.record(UserField::Email, UserViolation::EmailRequired);
    } else if !is_plausible_email(email) {
        report.record(UserField::Email, UserViolation::EmailInvalid);
    } else if others().any(|user| user.email == email) {
        report.record(UserField::Email, UserViolation::EmailTaken);
    }

    if draft.role.trim().is_empty() {
        report.record(UserField::Role, UserViolation::RoleRequired);
    }

    report
}

/// Flags a role that is not among the role names offered by the form.
///
/// A blank role is left to [`validate_user`].
pub fn check_role_option(report: &mut ValidationReport, role: &str, role_options: &[String]) {
    if !role.trim().is_empty() && !role_options.iter().any(|option| option == role) {
        report.record(UserField::Role, UserViolation::RoleUnknown);
    }
}

/// Returns the draft with name and email trimmed, as validated.
#[must_use]
pub fn normalized_user_draft(draft: &UserDraft) -> UserDraft {
    UserDraft {
        name: draft.name.trim().to_owned(),
        email: draft.email.trim().to_owned(),
        role: draft.role.clone(),
        status: draft.status,
    }
}
