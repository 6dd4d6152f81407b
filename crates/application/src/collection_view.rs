//! Client-side search, filtering, and pagination over fetched collections.
//!
//! The backend returns whole collections, so every page derives its visible
//! slice locally. [`apply`] is the pure derivation; [`CollectionView`] holds
//! the operator's search and paging state and resets the page index whenever
//! the filtered set may have changed underneath it.

use std::num::NonZeroUsize;

use rbac_admin_core::{AppError, AppResult};

/// Paging position within a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,
    /// Maximum number of items per page.
    pub page_size: NonZeroUsize,
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub fn new(page: usize, page_size: NonZeroUsize) -> Self {
        Self { page, page_size }
    }

    fn bounds(&self, total: usize) -> (usize, usize) {
        let start = self.page.saturating_mul(self.page_size.get()).min(total);
        let end = start.saturating_add(self.page_size.get()).min(total);
        (start, end)
    }
}

/// Page of a filtered collection, borrowed from the source snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSlice<'a, T> {
    /// Items on the requested page, in source order.
    pub visible: Vec<&'a T>,
    /// Number of items passing the search and predicate.
    pub total: usize,
}

/// Derives the visible page of a collection.
///
/// Items are kept when `extra_predicate` (if any) accepts them and the value
/// returned by `search_field` contains `search_text`, ignoring case. `total`
/// counts every kept item; `visible` is the `page`-th window of `page_size`
/// kept items, clamped to the kept range.
pub fn apply<'a, T, F>(
    collection: &'a [T],
    search_text: &str,
    search_field: F,
    page: PageRequest,
    extra_predicate: Option<&dyn Fn(&T) -> bool>,
) -> VisibleSlice<'a, T>
where
    F: Fn(&T) -> &str,
{
    let needle = search_text.to_lowercase();
    let filtered: Vec<&'a T> = collection
        .iter()
        .filter(|item| extra_predicate.is_none_or(|predicate| predicate(item)))
        .filter(|item| needle.is_empty() || search_field(item).to_lowercase().contains(&needle))
        .collect();

    let total = filtered.len();
    let (start, end) = page.bounds(total);

    VisibleSlice {
        visible: filtered[start..end].to_vec(),
        total,
    }
}

/// Returns the number of pages needed to show `total` items.
#[must_use]
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// Selectable page sizes and the size a fresh view starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    page_sizes: Vec<NonZeroUsize>,
    default_page_size: NonZeroUsize,
}

impl PaginationOptions {
    /// Creates pagination options, requiring the default to be selectable.
    pub fn new(page_sizes: Vec<NonZeroUsize>, default_page_size: NonZeroUsize) -> AppResult<Self> {
        if !page_sizes.contains(&default_page_size) {
            return Err(AppError::Validation(format!(
                "default page size {default_page_size} is not one of the selectable page sizes"
            )));
        }

        Ok(Self {
            page_sizes,
            default_page_size,
        })
    }

    /// Returns the selectable page sizes.
    #[must_use]
    pub fn page_sizes(&self) -> &[NonZeroUsize] {
        self.page_sizes.as_slice()
    }

    /// Returns the initial page size.
    #[must_use]
    pub fn default_page_size(&self) -> NonZeroUsize {
        self.default_page_size
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        let page_sizes: Vec<NonZeroUsize> = [5, 10, 25]
            .into_iter()
            .filter_map(NonZeroUsize::new)
            .collect();
        let default_page_size = page_sizes.first().copied().unwrap_or(NonZeroUsize::MIN);

        Self {
            page_sizes,
            default_page_size,
        }
    }
}

/// Search and paging state for one collection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    options: PaginationOptions,
    search_text: String,
    page: usize,
    page_size: NonZeroUsize,
}

impl CollectionView {
    /// Creates a view on the first page with the default page size.
    #[must_use]
    pub fn new(options: PaginationOptions) -> Self {
        let page_size = options.default_page_size();
        Self {
            options,
            search_text: String::new(),
            page: 0,
            page_size,
        }
    }

    /// Returns the current search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.search_text.as_str()
    }

    /// Returns the current zero-based page index.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the current page size.
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Returns the configured pagination options.
    #[must_use]
    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    /// Replaces the search text. A different value returns to the first page.
    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        let search_text = search_text.into();
        if search_text != self.search_text {
            self.search_text = search_text;
            self.page = 0;
        }
    }

    /// Selects a page size from the configured options and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> AppResult<()> {
        let page_size = NonZeroUsize::new(page_size)
            .filter(|size| self.options.page_sizes().contains(size))
            .ok_or_else(|| {
                AppError::Validation(format!("page size {page_size} is not selectable"))
            })?;

        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Moves to a page, clamped to the last page holding `total` items.
    pub fn set_page(&mut self, page: usize, total: usize) {
        let last_page = page_count(total, self.page_size).saturating_sub(1);
        self.page = page.min(last_page);
    }

    /// Returns to the first page after the source collection or a filter changed.
    pub fn reset_page(&mut self) {
        self.page = 0;
    }

    /// Returns the current paging position.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Derives the visible slice of `collection` for the current state.
    pub fn apply<'a, T, F>(
        &self,
        collection: &'a [T],
        search_field: F,
        extra_predicate: Option<&dyn Fn(&T) -> bool>,
    ) -> VisibleSlice<'a, T>
    where
        F: Fn(&T) -> &str,
    {
        apply(
            collection,
            self.search_text.as_str(),
            search_field,
            self.page_request(),
            extra_predicate,
        )
    }
}

#[cfg(test)]
mod tests;
