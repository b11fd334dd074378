// Pagination envelope
//
// Every paginated listing returns this shape. An empty result set
// still reports one page so clients can render "page 1 of 1".

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One page of results plus paging metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    /// Total matching documents across all pages
    pub total_docs: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    /// Build a page from a slice of results and the overall count.
    /// `page` is 1-based; `limit` must be positive.
    pub fn new(docs: Vec<T>, total_docs: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total_docs == 0 {
            1
        } else {
            (total_docs + limit - 1) / limit
        };
        Self {
            docs,
            total_docs,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    /// Zero-based offset of the first document on `page`
    pub fn offset(page: i64, limit: i64) -> i64 {
        (page - 1) * limit
    }
}
