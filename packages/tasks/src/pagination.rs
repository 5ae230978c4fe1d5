// ABOUTME: Pagination utilities for the task list
// ABOUTME: Normalizes page/limit query values and builds the list response envelope

use serde::{Deserialize, Serialize};

/// Default page size when the query omits `limit`
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size to prevent performance issues
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

/// Query parameters for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed, defaults to 1)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Number of items per page (defaults to DEFAULT_PAGE_SIZE, max MAX_PAGE_SIZE)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    MIN_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Validate and normalize pagination parameters.
    /// Returns (limit, offset) suitable for SQL queries.
    pub fn validate(&self) -> (i64, i64) {
        let page = self.page();
        let limit = self.limit();

        // Calculate offset (0-indexed for SQL)
        let offset = (page - 1).saturating_mul(limit);

        (limit, offset)
    }

    /// Limit clamped between 1 and MAX_PAGE_SIZE
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.validate().1
    }

    /// Page number, at least MIN_PAGE
    pub fn page(&self) -> i64 {
        self.page.max(MIN_PAGE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(MIN_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Metadata about pagination state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of tasks across all pages
    pub total_items: i64,

    /// Number of tasks on this page
    pub item_count: i64,

    pub items_per_page: i64,

    pub total_pages: i64,

    /// Current page number (1-indexed)
    pub current_page: i64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, item_count: i64, total_items: i64) -> Self {
        let items_per_page = params.limit();
        let total_pages = (total_items + items_per_page - 1) / items_per_page;

        Self {
            total_items,
            item_count,
            items_per_page,
            total_pages,
            current_page: params.page(),
        }
    }
}

/// One page of results together with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        let meta = PaginationMeta::new(params, items.len() as i64, total_items);
        Self { items, meta }
    }
}
