//! List query parameters and pagination

use crate::core::error::{FieldValidationError, SyndicationResult, ValidationError};
use crate::core::schema::{CollectionSchema, SortSpec};
use serde::{Deserialize, Serialize};

/// Parameters accepted when listing a resource
///
/// ```text
/// GET /syndication_out?page=2&limit=10
/// GET /syndication_out?sort=created_at:asc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Sort expression: `field`, `field:asc` or `field:desc`
    ///
    /// Defaults to the collection's declared ordering.
    pub sort: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort: None,
        }
    }
}

impl ListParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, between 1 and 100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Resolve the requested ordering against a schema
    pub fn sort_for(&self, schema: &CollectionSchema) -> SyndicationResult<SortSpec> {
        match self.sort.as_deref() {
            None | Some("") => Ok(schema.default_sort.clone()),
            Some(expr) => schema.parse_sort(expr).ok_or_else(|| {
                ValidationError::FieldErrors(vec![FieldValidationError::new(
                    "sort",
                    format!("cannot sort by '{}'", expr),
                )])
                .into()
            }),
        }
    }

    /// Slice one page out of an already ordered list
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let page = self.page();
        let limit = self.limit();
        let total = items.len();
        let data = items
            .into_iter()
            .skip(offset(page, limit))
            .take(limit)
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Index of the first item on `page`; saturates for pages far past the end
fn offset(page: usize, limit: usize) -> usize {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Paginated response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = offset(page, limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
