//! Page-number pagination.
//!
//! Resolution is lenient in the same way for every list in the app: a
//! missing or malformed `?page=` shows the first page, and a page number
//! outside `1..=num_pages` shows the last page. An empty result set still
//! has one (empty) page.

use serde::Serialize;

/// Items per page on the to-do list.
pub const TODO_PAGE_SIZE: i64 = 10;

/// Comments per page on the to-do detail view.
pub const COMMENT_PAGE_SIZE: i64 = 5;

/// The slice of a counted result set selected by a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, always within `1..=num_pages`.
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    /// Total number of rows across all pages.
    pub count: i64,
}

impl PageWindow {
    /// Resolve the raw `page` query value against `count` rows.
    ///
    /// `per_page` values below 1 are treated as 1.
    pub fn resolve(requested: Option<&str>, count: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let count = count.max(0);
        let num_pages = ((count + per_page - 1) / per_page).max(1);

        let number = match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            None => 1,
            Some(n) if n < 1 || n > num_pages => num_pages,
            Some(n) => n,
        };

        Self {
            number,
            num_pages,
            per_page,
            count,
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_number(&self) -> Option<i64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_number(&self) -> Option<i64> {
        self.has_previous().then_some(self.number - 1)
    }

    /// 1-based index of the first row on this page (0 when empty).
    pub fn start_index(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-based index of the last row on this page (0 when empty).
    pub fn end_index(&self) -> i64 {
        (self.offset() + self.per_page).min(self.count)
    }
}

/// One page of items plus the navigation data templates need.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
    pub start_index: i64,
    pub end_index: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(window: PageWindow, items: Vec<T>) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
            previous_page_number: window.previous_number(),
            next_page_number: window.next_number(),
            start_index: window.start_index(),
            end_index: window.end_index(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
