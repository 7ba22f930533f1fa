//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The transactions to return per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}

/// Resolve the requested page and page size against `config`, returning the
/// SQL `(limit, offset)` pair.
///
/// A missing page or page size falls back to the defaults; a page size
/// outside `1..=max_page_size` is clamped; page numbers start at 1.
pub fn resolve_page(
    page: Option<u64>,
    page_size: Option<u64>,
    config: &PaginationConfig,
) -> (u64, u64) {
    let page = page.unwrap_or(config.default_page).max(1);
    let page_size = page_size
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size);

    (page_size, (page - 1) * page_size)
}
