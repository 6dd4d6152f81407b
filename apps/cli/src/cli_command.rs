use std::collections::BTreeMap;

use rbac_admin_core::{AppError, AppResult, EntityId};
use rbac_admin_domain::UserStatus;

pub const USAGE: &str = "\
usage: rbac-admin <command> [--flag value]...

listing:
  users        [--search TEXT] [--role ROLE] [--page N] [--page-size N]
  roles        [--search TEXT] [--page N] [--page-size N]
  permissions  [--search TEXT] [--page N] [--page-size N]

permissions:
  add-permission     --name NAME
  rename-permission  --id ID --name NAME
  delete-permission  --id ID

roles:
  add-role     --name NAME [--permission ID]...
  edit-role    --id ID [--name NAME] [--toggle ID]...
  delete-role  --id ID

users:
  add-user     --name NAME --email EMAIL --role ROLE [--status Active|Inactive]
  edit-user    --id ID [--name NAME] [--email EMAIL] [--role ROLE] [--status STATUS]
  delete-user  --id ID";

/// Search and paging flags shared by the listing commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    /// Zero-based; operators type one-based page numbers.
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Field overrides applied to a user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    ListUsers {
        query: ListQuery,
        role: Option<String>,
    },
    ListRoles(ListQuery),
    ListPermissions(ListQuery),
    AddPermission {
        name: String,
    },
    RenamePermission {
        id: EntityId,
        name: String,
    },
    DeletePermission {
        id: EntityId,
    },
    AddRole {
        name: String,
        permissions: Vec<EntityId>,
    },
    EditRole {
        id: EntityId,
        name: Option<String>,
        toggles: Vec<EntityId>,
    },
    DeleteRole {
        id: EntityId,
    },
    AddUser(UserFields),
    EditUser {
        id: EntityId,
        fields: UserFields,
    },
    DeleteUser {
        id: EntityId,
    },
}

impl CliCommand {
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Ok(Self::Help);
        };
        let mut flags = Flags::parse(args)?;

        let command = match name.as_str() {
            "help" | "--help" | "-h" => Self::Help,
            "users" => Self::ListUsers {
                role: flags.optional("role"),
                query: flags.list_query()?,
            },
            "roles" => Self::ListRoles(flags.list_query()?),
            "permissions" => Self::ListPermissions(flags.list_query()?),
            "add-permission" => Self::AddPermission {
                name: flags.required("name")?,
            },
            "rename-permission" => Self::RenamePermission {
                id: flags.required_id()?,
                name: flags.required("name")?,
            },
            "delete-permission" => Self::DeletePermission {
                id: flags.required_id()?,
            },
            "add-role" => Self::AddRole {
                name: flags.required("name")?,
                permissions: flags.ids("permission"),
            },
            "edit-role" => Self::EditRole {
                id: flags.required_id()?,
                name: flags.optional("name"),
                toggles: flags.ids("toggle"),
            },
            "delete-role" => Self::DeleteRole {
                id: flags.required_id()?,
            },
            "add-user" => Self::AddUser(flags.user_fields()?),
            "edit-user" => Self::EditUser {
                id: flags.required_id()?,
                fields: flags.user_fields()?,
            },
            "delete-user" => Self::DeleteUser {
                id: flags.required_id()?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}'\n\n{USAGE}"
                )));
            }
        };

        flags.finish()?;
        Ok(command)
    }
}

/// `--name value` pairs; repeated flags keep every value in order.
struct Flags {
    values: BTreeMap<String, Vec<String>>,
}

impl Flags {
    fn parse(args: impl Iterator<Item = String>) -> AppResult<Self> {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut args = args.peekable();

        while let Some(arg) = args.next() {
            let Some(name) = arg.strip_prefix("--") else {
                return Err(AppError::Validation(format!(
                    "unexpected argument '{arg}'"
                )));
            };
            let value = args
                .next_if(|next| !next.starts_with("--"))
                .ok_or_else(|| AppError::Validation(format!("flag --{name} needs a value")))?;
            values.entry(name.to_owned()).or_default().push(value);
        }

        Ok(Self { values })
    }

    fn optional(&mut self, name: &str) -> Option<String> {
        self.values
            .remove(name)
            .and_then(|mut values| values.pop())
    }

    fn required(&mut self, name: &str) -> AppResult<String> {
        self.optional(name)
            .ok_or_else(|| AppError::Validation(format!("flag --{name} is required")))
    }

    fn required_id(&mut self) -> AppResult<EntityId> {
        self.required("id")
            .map(|value| EntityId::parse_operator_input(&value))
    }

    fn ids(&mut self, name: &str) -> Vec<EntityId> {
        self.values
            .remove(name)
            .unwrap_or_default()
            .iter()
            .map(|value| EntityId::parse_operator_input(value))
            .collect()
    }

    fn number(&mut self, name: &str) -> AppResult<Option<usize>> {
        self.optional(name)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|error| {
                    AppError::Validation(format!("invalid --{name} value '{value}': {error}"))
                })
            })
            .transpose()
    }

    fn list_query(&mut self) -> AppResult<ListQuery> {
        let page = match self.number("page")? {
            Some(0) => {
                return Err(AppError::Validation(
                    "--page starts at 1".to_owned(),
                ));
            }
            Some(page) => page - 1,
            None => 0,
        };

        Ok(ListQuery {
            search: self.optional("search").unwrap_or_default(),
            page,
            page_size: self.number("page-size")?,
        })
    }

    fn user_fields(&mut self) -> AppResult<UserFields> {
        let status = self
            .optional("status")
            .map(|value| parse_status(&value))
            .transpose()?;

        Ok(UserFields {
            name: self.optional("name"),
            email: self.optional("email"),
            role: self.optional("role"),
            status,
        })
    }

    fn finish(self) -> AppResult<()> {
        match self.values.keys().next() {
            Some(name) => Err(AppError::Validation(format!(
                "flag --{name} is not accepted by this command"
            ))),
            None => Ok(()),
        }
    }
}

fn parse_status(value: &str) -> AppResult<UserStatus> {
    UserStatus::all()
        .iter()
        .copied()
        .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "invalid --status value '{value}': expected Active or Inactive"
            ))
        })
}
