use std::num::NonZeroUsize;
use std::sync::Arc;

use rbac_admin_application::{
    EntityDirectory, MutationReceipt, PaginationOptions, PermissionsPage, RolesPage,
    SubmitOutcome, UsersPage, ValidationReport, VisibleSlice, page_count,
};
use rbac_admin_core::{AppError, AppResult};
use rbac_admin_domain::{Permission, Role, User};

use crate::cli_command::{CliCommand, ListQuery, USAGE, UserFields};

/// One directory port per entity kind.
pub struct Directories {
    pub users: Arc<dyn EntityDirectory<User>>,
    pub roles: Arc<dyn EntityDirectory<Role>>,
    pub permissions: Arc<dyn EntityDirectory<Permission>>,
}

/// Runs one command against fresh page view-models and returns the text to print.
pub async fn execute(
    command: CliCommand,
    directories: &Directories,
    pagination: &PaginationOptions,
) -> AppResult<String> {
    match command {
        CliCommand::Help => Ok(USAGE.to_owned()),
        CliCommand::ListUsers { query, role } => {
            let mut page = users_page(directories, pagination);
            page.mount().await?;
            apply_query(&query, |page_size| page.set_page_size(page_size))?;
            page.set_search_text(query.search.as_str());
            page.set_role_filter(role);
            page.set_page(query.page);

            let view = page.page().view();
            let mut lines = vec![format!(
                "role filter options: {}",
                page.role_filter_options().join(", ")
            )];
            lines.extend(render_slice(&page.visible(), view.page(), view.page_size(), |user| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    user.id,
                    user.name,
                    user.email,
                    user.role,
                    user.status.as_str()
                )
            }));
            Ok(lines.join("\n"))
        }
        CliCommand::ListRoles(query) => {
            let mut page = roles_page(directories, pagination);
            page.mount().await?;
            apply_query(&query, |page_size| page.set_page_size(page_size))?;
            page.set_search_text(query.search.as_str());
            page.set_page(query.page);

            let view = page.page().view();
            let lines = render_slice(&page.visible(), view.page(), view.page_size(), |role| {
                format!("{}\t{}\t{}", role.id, role.name, role.permission_summary())
            });
            Ok(lines.join("\n"))
        }
        CliCommand::ListPermissions(query) => {
            let mut page = permissions_page(directories, pagination);
            page.mount().await?;
            apply_query(&query, |page_size| page.set_page_size(page_size))?;
            page.set_search_text(query.search.as_str());
            page.set_page(query.page);

            let view = page.page().view();
            let lines = render_slice(&page.visible(), view.page(), view.page_size(), |permission| {
                format!("{}\t{}", permission.id, permission.name)
            });
            Ok(lines.join("\n"))
        }
        CliCommand::AddPermission { name } => {
            let mut page = permissions_page(directories, pagination);
            page.mount().await?;
            page.begin_add();
            if let Some(new_name) = page.new_name_mut() {
                *new_name = name;
            }

            match page.submit_add().await? {
                SubmitOutcome::Saved(receipt) => Ok(describe_receipt(&receipt, |permission| {
                    format!("permission {} '{}'", permission.id, permission.name)
                })),
                SubmitOutcome::Rejected(violation) => {
                    Err(AppError::Validation(violation.message().to_owned()))
                }
            }
        }
        CliCommand::RenamePermission { id, name } => {
            let mut page = permissions_page(directories, pagination);
            page.mount().await?;
            page.begin_rename(&id)?;
            if let Some(rename) = page.rename_name_mut() {
                *rename = name;
            }
            page.submit_rename().await?;
            Ok(format!("renamed permission {id}"))
        }
        CliCommand::DeletePermission { id } => {
            let mut page = permissions_page(directories, pagination);
            page.delete(id.clone()).await?;
            Ok(format!("deleted permission {id}"))
        }
        CliCommand::AddRole { name, permissions } => {
            let mut page = roles_page(directories, pagination);
            page.mount().await?;
            page.begin_create().await?;
            if let Some(editor) = page.editor_mut() {
                editor.set_name(name);
            }
            for id in permissions {
                page.toggle_permission(id)?;
            }

            let receipt = page.save().await?;
            Ok(describe_receipt(&receipt, describe_role))
        }
        CliCommand::EditRole { id, name, toggles } => {
            let mut page = roles_page(directories, pagination);
            page.mount().await?;
            page.begin_edit(&id).await?;
            if let (Some(editor), Some(name)) = (page.editor_mut(), name) {
                editor.set_name(name);
            }
            for id in toggles {
                page.toggle_permission(id)?;
            }

            let receipt = page.save().await?;
            Ok(describe_receipt(&receipt, describe_role))
        }
        CliCommand::DeleteRole { id } => {
            let mut page = roles_page(directories, pagination);
            page.delete(id.clone()).await?;
            Ok(format!("deleted role {id}"))
        }
        CliCommand::AddUser(fields) => {
            let mut page = users_page(directories, pagination);
            page.mount().await?;
            page.begin_create().await?;
            apply_user_fields(&mut page, fields);
            submit_user(&mut page).await
        }
        CliCommand::EditUser { id, fields } => {
            let mut page = users_page(directories, pagination);
            page.mount().await?;
            page.begin_edit(&id).await?;
            apply_user_fields(&mut page, fields);
            submit_user(&mut page).await
        }
        CliCommand::DeleteUser { id } => {
            let mut page = users_page(directories, pagination);
            page.delete(id.clone()).await?;
            Ok(format!("deleted user {id}"))
        }
    }
}

fn users_page(directories: &Directories, pagination: &PaginationOptions) -> UsersPage {
    UsersPage::new(
        directories.users.clone(),
        directories.roles.clone(),
        pagination.clone(),
    )
}

fn roles_page(directories: &Directories, pagination: &PaginationOptions) -> RolesPage {
    RolesPage::new(
        directories.roles.clone(),
        directories.permissions.clone(),
        pagination.clone(),
    )
}

fn permissions_page(directories: &Directories, pagination: &PaginationOptions) -> PermissionsPage {
    PermissionsPage::new(directories.permissions.clone(), pagination.clone())
}

fn apply_query(
    query: &ListQuery,
    set_page_size: impl FnOnce(usize) -> AppResult<()>,
) -> AppResult<()> {
    match query.page_size {
        Some(page_size) => set_page_size(page_size),
        None => Ok(()),
    }
}

fn render_slice<T>(
    slice: &VisibleSlice<'_, T>,
    page: usize,
    page_size: NonZeroUsize,
    render_row: impl Fn(&T) -> String,
) -> Vec<String> {
    let pages = page_count(slice.total, page_size).max(1);

    let mut lines = vec![format!(
        "{} matching, page {} of {pages}",
        slice.total,
        page + 1
    )];
    lines.extend(slice.visible.iter().map(|item| render_row(item)));
    lines
}

fn describe_receipt<E>(receipt: &MutationReceipt<E>, describe: impl Fn(&E) -> String) -> String {
    match receipt {
        MutationReceipt::Created(record) => format!("created {}", describe(record)),
        MutationReceipt::Updated(record) => format!("updated {}", describe(record)),
        MutationReceipt::Deleted(id) => format!("deleted {id}"),
    }
}

fn describe_role(role: &Role) -> String {
    format!(
        "role {} '{}': {}",
        role.id,
        role.name,
        role.permission_summary()
    )
}

fn apply_user_fields(page: &mut UsersPage, fields: UserFields) {
    let Some(draft) = page.draft_mut() else {
        return;
    };

    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(email) = fields.email {
        draft.email = email;
    }
    if let Some(role) = fields.role {
        draft.role = role;
    }
    if let Some(status) = fields.status {
        draft.status = status;
    }
}

async fn submit_user(page: &mut UsersPage) -> AppResult<String> {
    match page.submit().await? {
        SubmitOutcome::Saved(receipt) => Ok(describe_receipt(&receipt, |user| {
            format!("user {} '{}' <{}> as {}", user.id, user.name, user.email, user.role)
        })),
        SubmitOutcome::Rejected(report) => Err(AppError::Validation(describe_report(&report))),
    }
}

fn describe_report(report: &ValidationReport) -> String {
    report
        .iter()
        .map(|(field, violation)| format!("{}: {}", field.as_str(), violation.message()))
        .collect::<Vec<_>>()
        .join("; ")
}
