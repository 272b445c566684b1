//! Offset/limit pagination.

use tracing::debug;
use trowel_types::{RawItem, TrowelError};

use crate::client::{FetchError, PageQuery, PageSource};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default page guard per endpoint.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Bounds for one pagination loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    page_size: usize,
    max_pages: Option<usize>,
}

impl PaginationLimits {
    /// Creates limits with the given page size and optional page guard.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` or `max_pages` is zero.
    pub fn new(page_size: usize, max_pages: Option<usize>) -> trowel_types::Result<Self> {
        if page_size == 0 {
            return Err(TrowelError::Config("page size must be positive".into()));
        }
        if max_pages == Some(0) {
            return Err(TrowelError::Config("page limit must be positive".into()));
        }
        Ok(Self {
            page_size,
            max_pages,
        })
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the page guard, if any.
    #[must_use]
    pub const fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

/// Position within one endpoint's pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCursor {
    /// Offset of the next page.
    pub offset: usize,
    /// Record count last reported by the source.
    pub total: usize,
    /// Pages fetched so far.
    pub pages: usize,
}

impl FetchCursor {
    /// Records a fetched page and returns true if another page should be
    /// requested.
    pub fn advance(&mut self, page_len: usize, count: usize, page_size: usize) -> bool {
        self.pages += 1;
        self.total = count;
        if page_len == 0 {
            return false;
        }
        self.offset += page_size;
        self.offset < self.total
    }
}

/// Fetches every record from `url`, page by page.
///
/// Stops on an empty page or once the offset passes the reported count.
///
/// # Errors
///
/// Returns the first page error, or [`FetchError::PageLimit`] if the source
/// keeps reporting more records than the page guard allows.
pub async fn fetch_all<S>(
    source: &S,
    url: &str,
    limits: &PaginationLimits,
) -> Result<Vec<RawItem>, FetchError>
where
    S: PageSource + ?Sized,
{
    let mut cursor = FetchCursor::default();
    let mut items = Vec::new();

    loop {
        if let Some(max_pages) = limits.max_pages {
            if cursor.pages >= max_pages {
                return Err(FetchError::PageLimit {
                    max_pages,
                    url: url.to_string(),
                });
            }
        }

        let query = PageQuery {
            limit: limits.page_size,
            offset: cursor.offset,
        };
        let page = source.fetch_page(url, query).await?;
        let page_len = page.results.len();
        debug!(url, offset = query.offset, records = page_len, count = page.count, "page");

        items.extend(page.results);
        if !cursor.advance(page_len, page.count, limits.page_size) {
            break;
        }
    }

    Ok(items)
}
