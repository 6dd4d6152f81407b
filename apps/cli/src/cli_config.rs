use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use rbac_admin_application::PaginationOptions;
use rbac_admin_core::{AppError, AppResult};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Where directory calls are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryMode {
    /// The REST backend at `api_base_url`.
    Http,
    /// A seeded in-process directory, for demos without a backend.
    Memory,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub directory_mode: DirectoryMode,
    pub api_base_url: Url,
    pub http_timeout: Duration,
    pub pagination: PaginationOptions,
}

impl CliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let directory_mode = match lookup("RBAC_DIRECTORY_MODE")
            .map(|value| value.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("http") => DirectoryMode::Http,
            Some("memory") => DirectoryMode::Memory,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "invalid RBAC_DIRECTORY_MODE value '{other}': expected 'http' or 'memory'"
                )));
            }
        };

        let raw_base_url =
            lookup("RBAC_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(raw_base_url.trim().trim_end_matches('/')).map_err(
            |error| {
                AppError::Validation(format!(
                    "invalid RBAC_API_BASE_URL value '{raw_base_url}': {error}"
                ))
            },
        )?;

        let http_timeout_secs = parse_u64(
            "RBAC_HTTP_TIMEOUT_SECS",
            lookup("RBAC_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "RBAC_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let defaults = PaginationOptions::default();
        let page_size = parse_usize(
            "RBAC_PAGE_SIZE",
            lookup("RBAC_PAGE_SIZE"),
            defaults.default_page_size().get(),
        )?;
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| {
            AppError::Validation("RBAC_PAGE_SIZE must be greater than zero".to_owned())
        })?;
        let pagination = PaginationOptions::new(defaults.page_sizes().to_vec(), page_size)
            .map_err(|_| {
                AppError::Validation(format!(
                    "RBAC_PAGE_SIZE must be one of {}",
                    join_sizes(defaults.page_sizes())
                ))
            })?;

        Ok(Self {
            directory_mode,
            api_base_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            pagination,
        })
    }
}

fn parse_u64(name: &str, value: Option<String>, default: u64) -> AppResult<u64> {
    match value {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_usize(name: &str, value: Option<String>, default: usize) -> AppResult<usize> {
    match value {
        Some(value) => value.trim().parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn join_sizes(sizes: &[NonZeroUsize]) -> String {
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
