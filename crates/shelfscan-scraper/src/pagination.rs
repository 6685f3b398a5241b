//! Page-number pagination for the browse endpoint.
//!
//! Pages are 1-based and requested in order. The upstream signals the end of
//! a category by returning an empty `results` list; there is no total count
//! or cursor. A configurable page cap guards against an upstream that never
//! returns an empty page; a category stopped by it is truncated.

use std::fmt;

/// Default page cap for one category.
pub const MAX_PAGES: u32 = 500;

/// Why a category crawl stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTermination {
    /// An empty page was returned: normal end of the category.
    Exhausted,
    /// A page request or decode failed; earlier pages' rows are kept.
    Aborted { page: u32, reason: String },
    /// The page cap was reached without an empty page; the category is truncated.
    PageLimit { max_pages: u32 },
}

impl CrawlTermination {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    /// `true` when the category still had results at the page cap.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::PageLimit { .. })
    }
}

impl fmt::Display for CrawlTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::Aborted { page, reason } => write!(f, "aborted on page {page}: {reason}"),
            Self::PageLimit { max_pages } => write!(f, "stopped at the {max_pages}-page limit"),
        }
    }
}

/// Hands out page numbers `1..=max_pages`.
#[derive(Debug, Clone)]
pub struct PageCursor {
    next: u32,
    max_pages: u32,
}

impl PageCursor {
    #[must_use]
    pub fn new(max_pages: u32) -> Self {
        Self { next: 1, max_pages }
    }

    /// Next page number, or `None` once the cap has been reached.
    pub fn next_page(&mut self) -> Option<u32> {
        if self.next > self.max_pages {
            return None;
        }
        let page = self.next;
        self.next += 1;
        Some(page)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(MAX_PAGES)
    }
}
