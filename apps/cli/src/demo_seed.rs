use std::sync::Arc;

use rbac_admin_core::EntityId;
use rbac_admin_domain::{Permission, Role, User, UserStatus};
use rbac_admin_infrastructure::InMemoryDirectory;
use tracing::info;

use crate::directory_commands::Directories;

const DEMO_PERMISSIONS: [&str; 4] = ["read", "write", "delete", "audit"];

/// Builds in-process directories holding a small sample organisation.
pub fn seeded_directories() -> Directories {
    let permissions: Vec<Permission> = (1_i64..)
        .zip(DEMO_PERMISSIONS)
        .map(|(id, name)| Permission::new(id, name))
        .collect();

    let roles = vec![
        demo_role(1, "admin", &permissions),
        demo_role(2, "editor", &permissions[..2]),
        demo_role(3, "viewer", &permissions[..1]),
        demo_role(4, "guest", &[]),
    ];

    let users = vec![
        demo_user(1, "Ada Lovelace", "ada@example.com", "admin", UserStatus::Active),
        demo_user(2, "Alan Turing", "alan@example.com", "editor", UserStatus::Active),
        demo_user(3, "Grace Hopper", "grace@example.com", "editor", UserStatus::Active),
        demo_user(4, "Edsger Dijkstra", "edsger@example.com", "viewer", UserStatus::Inactive),
        demo_user(5, "Barbara Liskov", "barbara@example.com", "viewer", UserStatus::Active),
        demo_user(6, "Ken Thompson", "ken@example.com", "admin", UserStatus::Active),
        demo_user(7, "Frances Allen", "frances@example.com", "guest", UserStatus::Inactive),
    ];

    info!(
        users = users.len(),
        roles = roles.len(),
        permissions = permissions.len(),
        "seeded in-memory directory"
    );

    Directories {
        users: Arc::new(InMemoryDirectory::seeded(users)),
        roles: Arc::new(InMemoryDirectory::seeded(roles)),
        permissions: Arc::new(InMemoryDirectory::seeded(permissions)),
    }
}

fn demo_role(id: i64, name: &str, permissions: &[Permission]) -> Role {
    Role {
        id: EntityId::Number(id),
        name: name.to_owned(),
        permissions: permissions.to_vec(),
    }
}

fn demo_user(id: i64, name: &str, email: &str, role: &str, status: UserStatus) -> User {
    User {
        id: EntityId::Number(id),
        name: name.to_owned(),
        email: email.to_owned(),
        role: role.to_owned(),
        status,
    }
}
