//! Offset pagination for list endpoints.

use crate::domain::Error;

/// Default page size when the client sends no `size` parameter.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated offset/limit pair.
///
/// `from` is the number of rows to skip and `size` the number of rows to
/// return. Both are applied verbatim to the query (`OFFSET from LIMIT size`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    from: i64,
    size: i64,
}

impl Page {
    /// Validate and construct a page. `from` must be non-negative and `size`
    /// strictly positive.
    pub fn new(from: i64, size: i64) -> Result<Self, Error> {
        if from < 0 {
            return Err(Error::invalid_request("from must not be negative"));
        }
        if size <= 0 {
            return Err(Error::invalid_request("size must be positive"));
        }
        Ok(Self { from, size })
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        self.from
    }

    /// Rows to return.
    pub fn limit(&self) -> i64 {
        self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}
