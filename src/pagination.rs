//! This modules defines the common functionality for paging data.

use crate::Error;

/// The largest value SQLite accepts for `LIMIT` and `OFFSET`.
const MAX_SQL_INTEGER: u64 = i64::MAX as u64;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A validated, 1-indexed page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The page number, starting from 1.
    pub number: u64,
    /// The maximum number of items on the page.
    pub size: u64,
}

impl Page {
    /// Create a page from the optional request parameters, falling back to
    /// the defaults in `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if either the page number or page
    /// size is zero, or if the page size or the number of items before the
    /// page is too large for SQLite's 64-bit signed integers.
    pub fn new(
        number: Option<u64>,
        size: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let number = number.unwrap_or(config.default_page);
        let size = size.unwrap_or(config.default_page_size);

        if number == 0 || size == 0 || size > MAX_SQL_INTEGER {
            return Err(Error::InvalidPagination);
        }

        match (number - 1).checked_mul(size) {
            Some(offset) if offset <= MAX_SQL_INTEGER => Ok(Self { number, size }),
            _ => Err(Error::InvalidPagination),
        }
    }

    /// The number of items that come before this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }
}
